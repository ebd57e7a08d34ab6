//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use crate::api::middleware::host_filter::HostBlocklist;
use crate::application::services::ShortUrlService;
use crate::domain::repositories::ShortUrlRepository;
use crate::utils::alias::AliasGenerator;

#[derive(Clone)]
pub struct AppState {
    pub short_url_service: Arc<ShortUrlService>,
    pub host_blocklist: Arc<HostBlocklist>,
}

impl AppState {
    /// Wires the service graph over the given repository.
    pub fn new(
        repository: Arc<dyn ShortUrlRepository>,
        aliases: AliasGenerator,
        host_blocklist: HostBlocklist,
    ) -> Self {
        Self {
            short_url_service: Arc::new(ShortUrlService::new(repository, aliases)),
            host_blocklist: Arc::new(host_blocklist),
        }
    }
}
