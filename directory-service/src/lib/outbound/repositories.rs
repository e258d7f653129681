pub mod department;
pub mod employee;
pub mod memory;

pub use department::PostgresDepartmentRepository;
pub use employee::PostgresEmployeeRepository;
pub use memory::InMemoryDirectory;
