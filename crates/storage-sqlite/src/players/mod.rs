mod model;
mod repository;


pub use model::PlayerDB;
pub use repository::PlayerRepository;
