pub mod game_manager;
pub mod game_socket;
pub mod game_thread;
pub mod session_store;
