pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod score;

// Load env from a simple, standardized location resolution.
// This uses dotenvy::dotenv().ok() which loads .env if present and silently ignores if missing.
pub fn load_env() {
    let _ = dotenvy::dotenv();
}
