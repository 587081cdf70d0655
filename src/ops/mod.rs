pub mod campaigns;
pub mod collection;
pub mod decks;

pub use campaigns::CampaignOps;
pub use collection::CollectionOps;
pub use decks::{DeckDetail, DeckOps};
