use std::io::{Cursor, Write};

use rolodex::codec::{self, archive, json, vcard, ExportFormat};
use rolodex::error::RolodexError;
use rolodex::model::*;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn w1aw_repeater() -> Contact {
    let mut info = RepeaterInfo::at("Newington, CT");
    info.frequency = Some(146.94);
    info.offset = Some(-0.6);
    info.tx_tone_mode = Some(ToneMode::Ctcss);
    info.tx_tone = Some(100.0);
    Contact::repeater("W1AW", "", info)
}

fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Rewrites the compression method recorded for `name` in both the local
/// header and the central directory.
fn set_compression_method(bytes: &mut [u8], name: &str, method: u16) {
    let name = name.as_bytes();
    let field = method.to_le_bytes();
    // (signature, offset of method, offset of name length, offset of name)
    for (signature, method_at, len_at, name_at) in [
        ([0x50, 0x4b, 0x03, 0x04], 8, 26, 30),
        ([0x50, 0x4b, 0x01, 0x02], 10, 28, 46),
    ] {
        let mut i = 0;
        while i + name_at <= bytes.len() {
            if bytes[i..i + 4] == signature {
                let len = u16::from_le_bytes([bytes[i + len_at], bytes[i + len_at + 1]]) as usize;
                if bytes.get(i + name_at..i + name_at + len) == Some(name) {
                    bytes[i + method_at..i + method_at + 2].copy_from_slice(&field);
                }
            }
            i += 1;
        }
    }
}

// ==========================================================================
// VCARD TESTS
// ==========================================================================

#[test]
fn vcard_repeater_line_for_w1aw() {
    let text = vcard::encode(&w1aw_repeater());
    assert!(text.contains("\r\nX-REPEATER-INFO:146.94;-0.6;CTCSS;100;;;\r\n"));
    assert!(text.contains("\r\nFN:W1AW\r\n"));
    assert!(text.contains("\r\nADR:;;;Newington\\, CT;;;\r\n"));
    assert!(text.contains("\r\nX-STATION-TYPE:repeater\r\n"));
}

#[test]
fn vcard_roundtrip_preserves_repeater_numbers() {
    let contact = w1aw_repeater();
    let back = vcard::decode(&vcard::encode(&contact));
    assert_eq!(back, contact);
}

#[test]
fn vcard_roundtrip_preserves_person_callsign_and_name() {
    let mut contact = Contact::person("K1ABC", "Ann Marie Lee");
    contact.website = Some("https://k1abc.example".into());
    let back = vcard::decode(&vcard::encode(&contact));
    assert_eq!(back.callsign, "K1ABC");
    assert_eq!(back.name, "Ann Marie Lee");
    assert_eq!(back.website, contact.website);
    assert!(back.is_person());
}

#[test]
fn vcard_does_not_carry_star() {
    let mut contact = Contact::person("K1ABC", "Ann");
    contact.star = true;
    assert!(!vcard::decode(&vcard::encode(&contact)).star);
}

#[test]
fn vcard_from_another_application() {
    let text = "BEGIN:VCARD\nVERSION:3.0\nN:Lee;Ann;;;\nitem1.URL;TYPE=home:http://example.com\nTEL;TYPE=cell:+1 555 0100\nEND:VCARD\n";
    let contact = vcard::decode(text);
    assert!(contact.is_person());
    assert_eq!(contact.callsign, "");
    assert_eq!(contact.name, "Ann Lee");
    assert_eq!(contact.website.as_deref(), Some("http://example.com"));
}

// ==========================================================================
// JSON TESTS
// ==========================================================================

#[test]
fn json_encode_is_the_stored_document() {
    let contact = w1aw_repeater();
    let text = json::encode(&contact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["cardType"], "repeater");
    assert_eq!(value["offset"], -0.6);
    assert!(value.get("id").is_none());
}

#[test]
fn export_format_dispatches_codec() {
    let contact = w1aw_repeater();
    for format in [ExportFormat::Vcf, ExportFormat::Json] {
        let text = format.encode(&contact).unwrap();
        assert_eq!(format.decode(&text).unwrap(), vec![contact.clone()]);
    }
}

// ==========================================================================
// ARCHIVE TESTS
// ==========================================================================

#[test]
fn archive_pack_names_entries_by_callsign() {
    let contacts = vec![
        w1aw_repeater(),
        Contact::person("W1AW", "Hiram Percy Maxim"),
        Contact::person("K1ABC", "Ann Lee"),
    ];
    let bytes = archive::pack(&contacts, ExportFormat::Vcf).unwrap();

    let zip = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
    let mut names: Vec<&str> = zip.file_names().collect();
    names.sort();
    assert_eq!(names, vec!["K1ABC.vcf", "W1AW-2.vcf", "W1AW.vcf"]);

    let back = archive::unpack(&bytes).unwrap();
    assert_eq!(back.len(), 3);
    assert!(back.contains(&contacts[0]));
}

#[test]
fn archive_unpack_skips_metadata_and_unknown_entries() {
    let card = vcard::encode(&Contact::person("K1ABC", "Ann"));
    let bytes = zip_of(&[
        ("cards/K1ABC.vcf", card.as_str()),
        ("__MACOSX/cards/._K1ABC.vcf", "binary junk"),
        ("cards/._K1ABC.vcf", "binary junk"),
        ("README.txt", "hello"),
        ("W1AW.json", r#"{"cardType":"repeater","callsign":"W1AW","location":"Newington"}"#),
    ]);

    let contacts = archive::unpack(&bytes).unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].callsign, "K1ABC");
    assert_eq!(contacts[1].location(), "Newington");
}

#[test]
fn archive_unpack_skips_bad_json_entry() {
    let bytes = zip_of(&[("bad.json", "{not json"), ("good.json", r#"{"callsign":"K1ABC","name":"Ann"}"#)]);
    let contacts = archive::unpack(&bytes).unwrap();
    assert_eq!(contacts.len(), 1);
}

#[test]
fn archive_unpack_skips_entries_in_unsupported_compression() {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, body) in [
        ("K1ABC.vcf", vcard::encode(&Contact::person("K1ABC", "Ann"))),
        ("W1AW.vcf", vcard::encode(&w1aw_repeater())),
        ("notes.txt", "73".to_string()),
    ] {
        writer.start_file(name, stored).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    let mut bytes = writer.finish().unwrap().into_inner();
    // bzip2 and LZMA are not compiled in
    set_compression_method(&mut bytes, "W1AW.vcf", 12);
    set_compression_method(&mut bytes, "notes.txt", 14);

    let contacts = archive::unpack(&bytes).unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].callsign, "K1ABC");
}

#[test]
fn archive_unpack_rejects_non_zip() {
    assert!(matches!(archive::unpack(b"not a zip"), Err(RolodexError::Archive(_))));
}

// ==========================================================================
// IMPORT FILE TESTS
// ==========================================================================

#[test]
fn import_file_reads_each_format() {
    let dir = tempfile::tempdir().unwrap();

    let vcf = dir.path().join("W1AW.VCF");
    std::fs::write(&vcf, vcard::encode(&w1aw_repeater())).unwrap();
    assert_eq!(codec::import_file(&vcf).unwrap(), vec![w1aw_repeater()]);

    let json_path = dir.path().join("cards.json");
    std::fs::write(
        &json_path,
        r#"[{"callsign":"K1ABC","name":"Ann"},{"cardType":"repeater","callsign":"W1AW","location":""}]"#,
    )
    .unwrap();
    assert_eq!(codec::import_file(&json_path).unwrap().len(), 2);

    let zip_path = dir.path().join("contacts.zip");
    let contacts = vec![w1aw_repeater(), Contact::person("K1ABC", "Ann")];
    std::fs::write(&zip_path, archive::pack(&contacts, ExportFormat::Json).unwrap()).unwrap();
    assert_eq!(codec::import_file(&zip_path).unwrap().len(), 2);
}

#[test]
fn import_file_rejects_other_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.csv");
    std::fs::write(&path, "callsign,name\nK1ABC,Ann\n").unwrap();
    assert!(matches!(
        codec::import_file(&path),
        Err(RolodexError::UnsupportedFormat { .. })
    ));
}

#[test]
fn import_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.vcf");
    assert!(matches!(codec::import_file(&path), Err(RolodexError::Io(_))));
}
