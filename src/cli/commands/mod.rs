pub mod admin;
pub mod backup;
pub mod collection;
pub mod config;
pub mod farmer;
pub mod report;
pub mod session;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(session::definitions())
        .chain(admin::definitions())
        .chain(farmer::definitions())
        .chain(collection::definitions())
        .chain(report::definitions())
        .chain(config::definitions())
        .chain(backup::definitions())
    {
        registry.register(entry);
    }
}
