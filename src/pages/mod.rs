pub mod chat;
pub mod footer;
pub mod home;

pub use chat::ChatPage;
pub use footer::Footer;
pub use home::HomePage;
