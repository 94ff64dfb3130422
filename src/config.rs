//! Environment-backed configuration

use di::inject;
use di::injectable;
use std::env;

pub struct BotConfig {
    pub dreams_per_page: u32,
}

#[injectable]
impl BotConfig {
    #[inject]
    pub fn create() -> BotConfig {
        dotenvy::dotenv().ok();
        let dreams_per_page = env::var("DREAMS_PER_PAGE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(5);

        BotConfig { dreams_per_page }
    }
}
