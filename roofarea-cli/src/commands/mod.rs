pub mod geocode;
pub mod lookup;
