//! Gemeinsamer Hub-Zustand
//!
//! Haelt Konfiguration, Raum-Store und die geteilten Zustands-Manager
//! als Arc-Referenzen, die sicher zwischen tokio-Tasks geteilt werden
//! koennen.

use palaver_db::RaumRepository;
use std::sync::Arc;

use crate::membership::MembershipManager;
use crate::registry::ConnectionRegistry;
use crate::router::EventRouter;

/// Konfiguration fuer den Hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Anzeigename des Hubs
    pub hub_name: String,
    /// Maximale gleichzeitige Verbindungen (0 = unbegrenzt)
    pub max_clients: u32,
    /// Maximale Nachrichtenlaenge in Bytes
    pub max_nachricht_laenge: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            hub_name: "Palaver Hub".to_string(),
            max_clients: 512,
            max_nachricht_laenge: 4096,
        }
    }
}

/// Gemeinsamer Hub-Zustand (thread-safe, Arc-geteilt)
///
/// Generisch ueber den Raum-Store: der Kern nimmt nie an, ob der Store
/// in-memory oder persistent ist.
pub struct HubState<R>
where
    R: RaumRepository + 'static,
{
    /// Hub-Konfiguration
    pub config: Arc<HubConfig>,
    /// Raum-Store (externer Kollaborateur)
    pub raum_repo: Arc<R>,
    /// Registry aller live Verbindungen
    pub registry: ConnectionRegistry,
    /// Raum-Mitgliedschaft
    pub mitgliedschaft: MembershipManager,
    /// Event-Router
    pub router: EventRouter,
}

impl<R> HubState<R>
where
    R: RaumRepository + 'static,
{
    /// Erstellt einen neuen HubState
    pub fn neu(config: HubConfig, raum_repo: Arc<R>) -> Arc<Self> {
        let registry = ConnectionRegistry::neu();
        let mitgliedschaft = MembershipManager::neu();
        let router = EventRouter::neu(registry.clone(), mitgliedschaft.clone());

        Arc::new(Self {
            config: Arc::new(config),
            raum_repo,
            registry,
            mitgliedschaft,
            router,
        })
    }
}
