pub mod chat;
pub mod doctor;
pub mod index;
pub mod init;
pub mod serve;
