pub mod access;
pub mod building;
pub mod code;
pub mod department;
pub mod floor;
pub mod org;
