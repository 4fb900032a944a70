pub mod card_queries;
