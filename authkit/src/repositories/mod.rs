pub mod errors;
pub mod in_memory;

pub use errors::RepositoryError;
pub use in_memory::InMemoryAuthenticatorRepository;
pub use in_memory::InMemoryPasswordInfoRepository;
