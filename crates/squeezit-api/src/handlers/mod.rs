pub mod compress;
pub mod health;
pub mod pages;
