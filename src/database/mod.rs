// Persistence subsystem using rusqlite.

mod highscore_db;

pub use highscore_db::HighscoreStore;
