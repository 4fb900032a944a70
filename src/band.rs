/// An amateur band and its inclusive frequency range in MHz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub name: &'static str,
    pub low_mhz: f64,
    pub high_mhz: f64,
}

impl Band {
    const fn new(name: &'static str, low_mhz: f64, high_mhz: f64) -> Self {
        Self { name, low_mhz, high_mhz }
    }

    pub fn contains(&self, mhz: f64) -> bool {
        mhz >= self.low_mhz && mhz <= self.high_mhz
    }
}

/// US amateur band plan, lowest band first.
pub const BAND_PLAN: [Band; 16] = [
    Band::new("160m", 1.8, 2.0),
    Band::new("80m", 3.5, 4.0),
    Band::new("60m", 5.3305, 5.405),
    Band::new("40m", 7.0, 7.3),
    Band::new("30m", 10.1, 10.15),
    Band::new("20m", 14.0, 14.35),
    Band::new("17m", 18.068, 18.168),
    Band::new("15m", 21.0, 21.45),
    Band::new("12m", 24.89, 24.99),
    Band::new("10m", 28.0, 29.7),
    Band::new("6m", 50.0, 54.0),
    Band::new("2m", 144.0, 148.0),
    Band::new("1.25m", 222.0, 225.0),
    Band::new("70cm", 420.0, 450.0),
    Band::new("33cm", 902.0, 928.0),
    Band::new("23cm", 1240.0, 1300.0),
];

/// The band containing `mhz`, if any.
pub fn band_for(mhz: f64) -> Option<&'static Band> {
    BAND_PLAN.iter().find(|b| b.contains(mhz))
}
