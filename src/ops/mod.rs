pub mod card_ops;
