//! Event-Router – Ziel-Selektoren aufloesen und Events zustellen
//!
//! Der Router loest ein Ziel (alle / Raum / Benutzer / Verbindung) ueber
//! Registry und Mitgliedschaft zu einer Verbindungs-Menge auf und stellt
//! das Event jedem Empfaenger einzeln zu.
//!
//! ## Zustellung
//! - Empfaenger-Listen werden vor dem Senden herauskopiert; waehrend der
//!   Zustellung wird keine Registry- oder Mitgliedschafts-Sperre gehalten.
//! - Zustellung ist pro Empfaenger unabhaengig: ein fehlgeschlagener
//!   Send (Client gerade getrennt, Queue voll) bricht die uebrigen nie
//!   ab und wird nicht an den Aufrufer gereicht.

use palaver_core::{ClientEvent, ConnectionId, Identity, RoomId};

use crate::membership::MembershipManager;
use crate::registry::ConnectionRegistry;

/// Ziel-Selektor fuer einen Dispatch
#[derive(Debug, Clone)]
pub enum Ziel {
    /// Alle aktuell verbundenen Clients
    Alle,
    /// Alle Mitglieds-Verbindungen eines Raums
    Raum(RoomId),
    /// Alle Verbindungen eines Benutzers (Multi-Device-Fan-Out)
    Benutzer(Identity),
    /// Genau eine Verbindung
    Verbindung(ConnectionId),
}

/// Zentraler Event-Router
///
/// Clone teilt Registry und Mitgliedschaft.
#[derive(Clone)]
pub struct EventRouter {
    registry: ConnectionRegistry,
    mitgliedschaft: MembershipManager,
}

impl EventRouter {
    /// Erstellt einen neuen Router ueber den geteilten Zustands-Managern
    pub fn neu(registry: ConnectionRegistry, mitgliedschaft: MembershipManager) -> Self {
        Self {
            registry,
            mitgliedschaft,
        }
    }

    /// Loest das Ziel auf und stellt das Event zu
    ///
    /// Gibt die Anzahl der erfolgreichen Zustellungen zurueck. Leere
    /// Empfaenger-Mengen sind gueltig und ergeben null Zustellungen.
    pub fn dispatch(&self, ziel: Ziel, event: ClientEvent) -> usize {
        match ziel {
            Ziel::Alle => {
                let sender = self.registry.alle_sender();
                sender.iter().filter(|s| s.senden(event.clone())).count()
            }
            Ziel::Raum(raum) => {
                let mitglieder = self.mitgliedschaft.mitglieder_von(&raum);
                self.an_verbindungen(&mitglieder, event)
            }
            Ziel::Benutzer(identitaet) => {
                let verbindungen = self.registry.verbindungen_von(&identitaet);
                self.an_verbindungen(&verbindungen, event)
            }
            Ziel::Verbindung(verbindung) => self.an_verbindungen(&[verbindung], event),
        }
    }

    /// Stellt ein Event an eine vorab eingefangene Verbindungs-Menge zu
    ///
    /// Wird fuer die Benachrichtigungs-Sequenz beim Raum-Loeschen
    /// verwendet, deren Empfaenger-Menge vor dem Aufloesen feststeht.
    pub fn dispatch_an_menge(&self, empfaenger: &[ConnectionId], event: ClientEvent) -> usize {
        self.an_verbindungen(empfaenger, event)
    }

    fn an_verbindungen(&self, verbindungen: &[ConnectionId], event: ClientEvent) -> usize {
        let mut gesendet = 0;
        for verbindung in verbindungen {
            match self.registry.sender_von(verbindung) {
                Some(sender) => {
                    if sender.senden(event.clone()) {
                        gesendet += 1;
                    }
                }
                None => {
                    tracing::debug!(
                        verbindung = %verbindung,
                        "Zustellung an unbekannte Verbindung uebersprungen"
                    );
                }
            }
        }
        gesendet
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
