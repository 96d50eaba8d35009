pub mod downloads;
pub mod export;
pub mod imports;
