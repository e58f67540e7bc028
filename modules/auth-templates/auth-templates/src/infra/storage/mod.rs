pub mod json_file_repo;
pub mod memory_repo;

pub use json_file_repo::JsonFileTemplateRepository;
pub use memory_repo::InMemoryTemplateRepository;
