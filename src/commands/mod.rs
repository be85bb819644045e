mod digest;
mod generate;
mod init;
mod validate;

pub use digest::digest_command;
pub use generate::generate_command;
pub use init::init_command;
pub use validate::validate_command;
