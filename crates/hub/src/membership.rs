//! Raum-Mitgliedschaft – Welche Verbindung ist in welchem Raum
//!
//! Mitgliedschaft ist pro Verbindung, nicht pro Identitaet: wechselt ein
//! Tab den Raum, bleiben andere Tabs desselben Benutzers unberuehrt.
//! Die Datenstruktur erlaubt Mitgliedschaft in mehreren Raeumen; die
//! Ein-Raum-Disziplin setzt die `HubSession` beim Raumwechsel durch.

use dashmap::DashMap;
use palaver_core::{ConnectionId, RoomId};
use std::sync::Arc;

/// Verwaltet die Raum-Mitgliedschaft aller Verbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct MembershipManager {
    inner: Arc<MembershipManagerInner>,
}

struct MembershipManagerInner {
    /// Raum -> Mitglieds-Verbindungen
    mitglieder: DashMap<RoomId, Vec<ConnectionId>>,
}

impl MembershipManager {
    /// Erstellt einen neuen, leeren Manager
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(MembershipManagerInner {
                mitglieder: DashMap::new(),
            }),
        }
    }

    /// Fuegt eine Verbindung einem Raum hinzu
    ///
    /// Idempotent: ein zweiter Beitritt hat keinen weiteren Effekt.
    pub fn beitreten(&self, raum: RoomId, verbindung: ConnectionId) {
        let mut eintrag = self.inner.mitglieder.entry(raum).or_default();
        if !eintrag.contains(&verbindung) {
            eintrag.push(verbindung);
            tracing::debug!(raum = %raum, verbindung = %verbindung, "Raum beigetreten");
        }
    }

    /// Entfernt eine Verbindung aus einem Raum
    ///
    /// Idempotent: das Verlassen ohne Mitgliedschaft ist ein No-Op.
    pub fn verlassen(&self, raum: RoomId, verbindung: ConnectionId) {
        if let Some(mut eintrag) = self.inner.mitglieder.get_mut(&raum) {
            eintrag.retain(|v| *v != verbindung);
            let ist_leer = eintrag.is_empty();
            drop(eintrag);
            if ist_leer {
                self.inner.mitglieder.remove_if(&raum, |_, m| m.is_empty());
            }
        }
    }

    /// Gibt alle Mitglieder eines Raums zurueck
    ///
    /// Leere Liste wenn der Raum unbekannt ist oder keine Mitglieder hat.
    pub fn mitglieder_von(&self, raum: &RoomId) -> Vec<ConnectionId> {
        self.inner
            .mitglieder
            .get(raum)
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Entfernt eine Verbindung aus jedem Raum (Disconnect-Pfad)
    ///
    /// Gegen gleichzeitige Beitritte/Austritte derselben Verbindung
    /// last-writer-konsistent; es bleiben nie verwaiste Eintraege zurueck.
    pub fn verbindung_entfernen(&self, verbindung: ConnectionId) {
        self.inner.mitglieder.iter_mut().for_each(|mut eintrag| {
            eintrag.value_mut().retain(|v| *v != verbindung);
        });
        // Leere Raum-Eintraege aufraeumen
        self.inner.mitglieder.retain(|_, m| !m.is_empty());

        tracing::debug!(verbindung = %verbindung, "Verbindung aus allen Raeumen entfernt");
    }

    /// Loest die Mitgliedschaft eines Raums auf
    ///
    /// Gibt die ehemaligen Mitglieder zurueck; wird beim Raum-Loeschen
    /// verwendet, dessen Benachrichtigungen an genau diese Menge gehen.
    pub fn raum_entfernen(&self, raum: &RoomId) -> Vec<ConnectionId> {
        let mitglieder = self
            .inner
            .mitglieder
            .remove(raum)
            .map(|(_, m)| m)
            .unwrap_or_default();

        if !mitglieder.is_empty() {
            tracing::debug!(raum = %raum, anzahl = mitglieder.len(), "Raum-Mitgliedschaft aufgeloest");
        }
        mitglieder
    }

    /// Anzahl der Raeume mit mindestens einem Mitglied
    pub fn belegte_raeume(&self) -> usize {
        self.inner.mitglieder.len()
    }
}

impl Default for MembershipManager {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
