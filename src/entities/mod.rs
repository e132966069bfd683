pub mod cartridge;
pub mod cartridge_location;
pub mod cartridge_movement;
pub mod department;
pub mod employee;
pub mod service_note;
pub mod storage_box;
pub mod warehouse;
