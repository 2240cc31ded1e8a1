//! Connection-Registry – Wer ist online, mit welchen Verbindungen
//!
//! Verwaltet die Zuordnung Identitaet -> live Verbindungen sowie die
//! Send-Queues aller verbundenen Clients. Ein Benutzer kann mehrere
//! Verbindungen gleichzeitig offen haben (Multi-Device/Multi-Tab).
//!
//! Die Praesenz-Liste (`snapshot`) ist nach dem ersten Auftreten einer
//! Identitaet geordnet und bleibt zwischen Mutationen stabil.

use dashmap::DashMap;
use palaver_core::{ClientEvent, ConnectionId, Identity, UserEntry};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::{HubError, HubResult};

/// Groesse der Send-Queue pro Verbindung
const SEND_QUEUE_GROESSE: usize = 64;

// ---------------------------------------------------------------------------
// ClientSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue einer verbundenen Verbindung
#[derive(Clone, Debug)]
pub struct ClientSender {
    pub verbindung: ConnectionId,
    pub identitaet: Identity,
    pub tx: mpsc::Sender<ClientEvent>,
}

impl ClientSender {
    /// Sendet ein Event nicht-blockierend an den Client
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    pub fn senden(&self, event: ClientEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(verbindung = %self.verbindung, "Send-Queue voll – Event verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(
                    verbindung = %self.verbindung,
                    "Send-Queue geschlossen (Client getrennt)"
                );
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ConnectionRegistry
// ---------------------------------------------------------------------------

/// Eine Identitaet mit ihren aktuell offenen Verbindungen
struct IdentitaetEintrag {
    identitaet: Identity,
    verbindungen: Vec<ConnectionId>,
}

/// Registry aller live Verbindungen
///
/// Thread-safe via Arc. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: Arc<ConnectionRegistryInner>,
}

struct ConnectionRegistryInner {
    /// Send-Queues, indiziert nach ConnectionId
    sender: DashMap<ConnectionId, ClientSender>,
    /// Identitaet -> Verbindungen, geordnet nach erstem Auftreten
    ///
    /// Registrieren/Abmelden mutieren beide Strukturen unter dieser
    /// Schreibsperre, damit Snapshot und Send-Map nie auseinanderlaufen.
    identitaeten: RwLock<Vec<IdentitaetEintrag>>,
}

impl ConnectionRegistry {
    /// Erstellt eine neue, leere Registry
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(ConnectionRegistryInner {
                sender: DashMap::new(),
                identitaeten: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Registriert eine Verbindung und gibt ihre Empfangs-Queue zurueck
    ///
    /// Der Transport liest aus dieser Queue und sendet die Events ueber
    /// den bidirektionalen Kanal an den Client.
    pub fn registrieren(
        &self,
        identitaet: Identity,
        verbindung: ConnectionId,
    ) -> HubResult<mpsc::Receiver<ClientEvent>> {
        let mut eintraege = self.inner.identitaeten.write();

        if self.inner.sender.contains_key(&verbindung) {
            return Err(HubError::DoppelteVerbindung {
                identitaet,
                verbindung,
            });
        }

        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        self.inner.sender.insert(
            verbindung,
            ClientSender {
                verbindung,
                identitaet: identitaet.clone(),
                tx,
            },
        );

        match eintraege
            .iter_mut()
            .find(|e| e.identitaet == identitaet)
        {
            Some(eintrag) => eintrag.verbindungen.push(verbindung),
            None => eintraege.push(IdentitaetEintrag {
                identitaet: identitaet.clone(),
                verbindungen: vec![verbindung],
            }),
        }

        tracing::debug!(identitaet = %identitaet, verbindung = %verbindung, "Verbindung registriert");
        Ok(rx)
    }

    /// Entfernt eine Verbindung aus der Registry
    ///
    /// Stilles No-Op wenn die Verbindung unbekannt ist – toleriert
    /// doppelte Disconnect-Callbacks.
    pub fn abmelden(&self, verbindung: ConnectionId) {
        let mut eintraege = self.inner.identitaeten.write();

        if self.inner.sender.remove(&verbindung).is_none() {
            return;
        }

        for eintrag in eintraege.iter_mut() {
            eintrag.verbindungen.retain(|v| *v != verbindung);
        }
        // Identitaeten ohne Verbindung verschwinden aus dem Snapshot
        eintraege.retain(|e| !e.verbindungen.is_empty());

        tracing::debug!(verbindung = %verbindung, "Verbindung abgemeldet");
    }

    /// Gibt alle Verbindungen eines Benutzers zurueck
    ///
    /// Leere Liste, nie ein Fehler, wenn die Identitaet unbekannt ist.
    pub fn verbindungen_von(&self, identitaet: &Identity) -> Vec<ConnectionId> {
        self.inner
            .identitaeten
            .read()
            .iter()
            .find(|e| &e.identitaet == identitaet)
            .map(|e| e.verbindungen.clone())
            .unwrap_or_default()
    }

    /// Praesenz-Snapshot fuer den UpdateUserList-Broadcast
    ///
    /// Pro Identitaet die aelteste noch offene Verbindung, geordnet nach
    /// dem ersten Auftreten der Identitaet.
    pub fn snapshot(&self) -> Vec<UserEntry> {
        self.inner
            .identitaeten
            .read()
            .iter()
            .filter_map(|e| {
                e.verbindungen.first().map(|v| UserEntry {
                    identity: e.identitaet.clone(),
                    connection: *v,
                })
            })
            .collect()
    }

    /// Gibt das Send-Handle einer Verbindung zurueck
    pub fn sender_von(&self, verbindung: &ConnectionId) -> Option<ClientSender> {
        self.inner.sender.get(verbindung).map(|e| e.clone())
    }

    /// Gibt die Send-Handles aller Verbindungen zurueck
    ///
    /// Die Handles werden herauskopiert, damit beim anschliessenden
    /// Senden keine Map-Sperre gehalten wird.
    pub fn alle_sender(&self) -> Vec<ClientSender> {
        self.inner.sender.iter().map(|e| e.value().clone()).collect()
    }

    /// Prueft ob eine Verbindung registriert ist
    pub fn ist_registriert(&self, verbindung: &ConnectionId) -> bool {
        self.inner.sender.contains_key(verbindung)
    }

    /// Gibt die Anzahl der registrierten Verbindungen zurueck
    pub fn verbindungs_anzahl(&self) -> usize {
        self.inner.sender.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(wer: &str) -> Identity {
        Identity::new(wer)
    }

    #[tokio::test]
    async fn registrieren_und_senden() {
        let registry = ConnectionRegistry::neu();
        let conn = ConnectionId::new();

        let mut rx = registry.registrieren(ident("alice"), conn).unwrap();
        assert!(registry.ist_registriert(&conn));

        let sender = registry.sender_von(&conn).expect("Sender muss vorhanden sein");
        assert!(sender.senden(ClientEvent::LeaveRoom));

        let empfangen = rx.try_recv().expect("Event muss vorhanden sein");
        assert_eq!(empfangen, ClientEvent::LeaveRoom);
    }

    #[test]
    fn doppelte_verbindung_wird_abgelehnt() {
        let registry = ConnectionRegistry::neu();
        let conn = ConnectionId::new();

        let _rx = registry.registrieren(ident("alice"), conn).unwrap();
        let fehler = registry.registrieren(ident("alice"), conn);
        assert!(matches!(
            fehler,
            Err(HubError::DoppelteVerbindung { .. })
        ));
    }

    #[test]
    fn abmelden_ist_idempotent() {
        let registry = ConnectionRegistry::neu();
        let conn = ConnectionId::new();

        let _rx = registry.registrieren(ident("alice"), conn).unwrap();
        registry.abmelden(conn);
        // Doppelter Disconnect-Callback ist harmlos
        registry.abmelden(conn);

        assert_eq!(registry.verbindungs_anzahl(), 0);
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn netto_menge_nach_registrieren_und_abmelden() {
        let registry = ConnectionRegistry::neu();
        let c1 = ConnectionId::new();
        let c2 = ConnectionId::new();
        let c3 = ConnectionId::new();

        let _r1 = registry.registrieren(ident("alice"), c1).unwrap();
        let _r2 = registry.registrieren(ident("alice"), c2).unwrap();
        let _r3 = registry.registrieren(ident("alice"), c3).unwrap();
        registry.abmelden(c2);

        let mut verbindungen = registry.verbindungen_von(&ident("alice"));
        verbindungen.sort_by_key(|v| v.inner());
        let mut erwartet = vec![c1, c3];
        erwartet.sort_by_key(|v| v.inner());
        assert_eq!(verbindungen, erwartet);
    }

    #[test]
    fn verbindungen_von_unbekannter_identitaet_ist_leer() {
        let registry = ConnectionRegistry::neu();
        assert!(registry.verbindungen_von(&ident("niemand")).is_empty());
    }

    #[test]
    fn snapshot_reihenfolge_und_repraesentant() {
        let registry = ConnectionRegistry::neu();
        let a1 = ConnectionId::new();
        let b1 = ConnectionId::new();
        let a2 = ConnectionId::new();

        let _ra1 = registry.registrieren(ident("alice"), a1).unwrap();
        let _rb1 = registry.registrieren(ident("bob"), b1).unwrap();
        let _ra2 = registry.registrieren(ident("alice"), a2).unwrap();

        // Reihenfolge: erstes Auftreten der Identitaet; Repraesentant:
        // aelteste offene Verbindung
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].identity, ident("alice"));
        assert_eq!(snapshot[0].connection, a1);
        assert_eq!(snapshot[1].identity, ident("bob"));

        // Faellt die aelteste Verbindung weg, rueckt die naechste nach
        registry.abmelden(a1);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot[0].identity, ident("alice"));
        assert_eq!(snapshot[0].connection, a2);

        // Mit der letzten Verbindung verschwindet die Identitaet
        registry.abmelden(a2);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].identity, ident("bob"));
    }

    #[test]
    fn clone_teilt_inneren_state() {
        let r1 = ConnectionRegistry::neu();
        let r2 = r1.clone();
        let conn = ConnectionId::new();

        let _rx = r1.registrieren(ident("alice"), conn).unwrap();
        assert!(r2.ist_registriert(&conn));
    }
}
