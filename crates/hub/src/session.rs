//! Hub-Session – Verbindungs-Lebenszyklus und Messaging-Operationen
//!
//! Jede live Verbindung bekommt eine `HubSession`. Der Transport ruft
//! `verbinden` beim Aufbau und `trennen` beim Abbau auf (genau einmal
//! pro Verbindung, unabhaengig vom Trenngrund) und reicht die
//! Operationen des Clients in der Reihenfolge durch, in der der Client
//! sie gesendet hat. Operationen verschiedener Verbindungen duerfen
//! beliebig verzahnt laufen.
//!
//! ## State Machine
//! ```text
//! Disconnected -> Connected -> Disconnected (terminal)
//! ```
//!
//! Die Identitaet wird einmalig beim Aufbau vom externen Resolver
//! uebernommen und in der Session gehalten.

use palaver_core::{ClientEvent, ConnectionId, Identity, RoomId, RoomInfo};
use palaver_db::RaumRepository;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::{HubError, HubResult};
use crate::router::Ziel;
use crate::state::HubState;

/// Controller fuer eine einzelne live Verbindung
pub struct HubSession<R>
where
    R: RaumRepository + 'static,
{
    state: Arc<HubState<R>>,
    verbindung: ConnectionId,
    identitaet: Identity,
}

impl<R> HubSession<R>
where
    R: RaumRepository + 'static,
{
    /// Baut die Session auf
    ///
    /// Registriert die Verbindung und verteilt danach die aktualisierte
    /// Praesenz-Liste an alle Clients. Gibt die Empfangs-Queue zurueck,
    /// aus der der Transport die Events fuer diesen Client liest.
    pub fn verbinden(
        state: Arc<HubState<R>>,
        verbindung: ConnectionId,
        identitaet: Identity,
    ) -> HubResult<(Self, mpsc::Receiver<ClientEvent>)> {
        let max = state.config.max_clients as usize;
        if max > 0 && state.registry.verbindungs_anzahl() >= max {
            tracing::warn!(identitaet = %identitaet, "Verbindung abgelehnt – Server voll");
            return Err(HubError::ServerVoll);
        }

        let rx = state.registry.registrieren(identitaet.clone(), verbindung)?;
        tracing::info!(identitaet = %identitaet, verbindung = %verbindung, "Client verbunden");

        let session = Self {
            state,
            verbindung,
            identitaet,
        };
        session.benutzer_liste_senden();
        Ok((session, rx))
    }

    /// Baut die Session ab
    ///
    /// Entfernt die Verbindung aus der Registry und aus jedem Raum und
    /// verteilt danach die aktualisierte Praesenz-Liste. Laeuft auch
    /// nach abnormalem Verbindungsende; doppelte Aufrufe sind harmlos.
    pub fn trennen(&self) {
        self.state.registry.abmelden(self.verbindung);
        self.state.mitgliedschaft.verbindung_entfernen(self.verbindung);

        tracing::info!(identitaet = %self.identitaet, verbindung = %self.verbindung, "Client getrennt");
        self.benutzer_liste_senden();
    }

    /// Legt einen neuen Raum an und verteilt die Raum-Liste an alle
    pub async fn raum_erstellen(&self, titel: &str) -> HubResult<RoomInfo> {
        let titel = titel.trim();
        if titel.is_empty() {
            return Err(HubError::UngueltigeEingabe(
                "Raum-Titel darf nicht leer sein".into(),
            ));
        }

        let record = self.state.raum_repo.erstellen(titel).await?;
        tracing::info!(
            identitaet = %self.identitaet,
            raum = %record.id,
            titel = %record.titel,
            "Raum erstellt"
        );

        self.raum_liste_senden().await?;
        Ok(record.als_info())
    }

    /// Loescht einen Raum samt Mitgliedschaft
    ///
    /// Unbekannte Raum-IDs sind ein stilles No-Op, damit konkurrierende
    /// Loesch-Aufrufe sich nicht gegenseitig zu Fehlern machen. Die
    /// Reihenfolge der drei Benachrichtigungen ist fix: Abschieds-
    /// Nachricht und LeaveRoom an die bisherigen Mitglieder, danach die
    /// neue Raum-Liste an alle.
    pub async fn raum_loeschen(&self, raum: RoomId) -> HubResult<()> {
        let record = match self.state.raum_repo.finden(raum).await? {
            Some(r) => r,
            None => {
                tracing::debug!(raum = %raum, "Loeschen eines unbekannten Raums ignoriert");
                return Ok(());
            }
        };

        self.state.raum_repo.loeschen(raum).await?;

        // Mitglieder-Menge vor den Benachrichtigungen einfangen
        let mitglieder = self.state.mitgliedschaft.raum_entfernen(&raum);
        self.state.router.dispatch_an_menge(
            &mitglieder,
            ClientEvent::NewMessage(format!("[{}] wurde geloescht", record.titel)),
        );
        self.state
            .router
            .dispatch_an_menge(&mitglieder, ClientEvent::LeaveRoom);
        self.raum_liste_senden().await?;

        tracing::info!(
            identitaet = %self.identitaet,
            raum = %raum,
            titel = %record.titel,
            mitglieder = mitglieder.len(),
            "Raum geloescht"
        );
        Ok(())
    }

    /// Wechselt den Raum dieser Verbindung
    ///
    /// Das Verlassen des alten Raums ist immer abgeschlossen bevor der
    /// Beitritt zum neuen beginnt; waehrend eines Wechsels ist die
    /// Verbindung nie in beiden Raeumen gleichzeitig Mitglied. IDs <= 0
    /// bedeuten "kein Raum" (erster Beitritt bzw. reines Verlassen).
    /// Unbekannte Raum-IDs sind ein stilles No-Op.
    pub async fn raum_wechseln(&self, alter_raum: RoomId, neuer_raum: RoomId) -> HubResult<()> {
        if alter_raum.ist_gueltig() {
            // Abschied geht an die bisherigen Mitglieder, den Wechsler
            // eingeschlossen – erst danach endet seine Mitgliedschaft
            if let Some(record) = self.state.raum_repo.finden(alter_raum).await? {
                self.state.router.dispatch(
                    Ziel::Raum(alter_raum),
                    ClientEvent::NewMessage(format!(
                        "[{}] verlaesst: {}",
                        self.identitaet, record.titel
                    )),
                );
            }
            self.state
                .mitgliedschaft
                .verlassen(alter_raum, self.verbindung);
        }

        if neuer_raum.ist_gueltig() {
            match self.state.raum_repo.finden(neuer_raum).await? {
                Some(record) => {
                    self.state
                        .mitgliedschaft
                        .beitreten(neuer_raum, self.verbindung);
                    self.state.router.dispatch(
                        Ziel::Raum(neuer_raum),
                        ClientEvent::NewMessage(format!(
                            "[{}] tritt bei: {}",
                            self.identitaet, record.titel
                        )),
                    );
                    tracing::debug!(
                        identitaet = %self.identitaet,
                        raum = %neuer_raum,
                        "Raum gewechselt"
                    );
                }
                None => {
                    tracing::debug!(raum = %neuer_raum, "Beitritt zu unbekanntem Raum ignoriert");
                }
            }
        }

        Ok(())
    }

    /// Sendet eine Chat-Nachricht
    ///
    /// Selektor-Vorrang: Ziel-Benutzer vor Raum vor Broadcast; genau
    /// ein Zweig wird ausgefuehrt. Direktnachrichten erreichen jede
    /// Verbindung des Ziel-Benutzers. Unbekannte Raum-IDs sind ein
    /// stilles No-Op.
    pub async fn nachricht_senden(
        &self,
        text: &str,
        raum: RoomId,
        ziel_benutzer: Option<&Identity>,
    ) -> HubResult<()> {
        if text.trim().is_empty() {
            return Err(HubError::UngueltigeEingabe(
                "Nachrichteninhalt darf nicht leer sein".into(),
            ));
        }
        let max = self.state.config.max_nachricht_laenge;
        if text.len() > max {
            return Err(HubError::UngueltigeEingabe(format!(
                "Nachricht zu lang: {} Bytes (Maximum: {})",
                text.len(),
                max
            )));
        }

        if let Some(ziel) = ziel_benutzer {
            self.state.router.dispatch(
                Ziel::Benutzer(ziel.clone()),
                ClientEvent::NewMessage(format!("[Von: {}] {}", self.identitaet, text)),
            );
        } else if raum.ist_gueltig() {
            match self.state.raum_repo.finden(raum).await? {
                Some(record) => {
                    self.state.router.dispatch(
                        Ziel::Raum(raum),
                        ClientEvent::NewMessage(format!("[{}] {}", record.titel, text)),
                    );
                }
                None => {
                    tracing::debug!(raum = %raum, "Nachricht an unbekannten Raum ignoriert");
                }
            }
        } else {
            self.state.router.dispatch(
                Ziel::Alle,
                ClientEvent::NewMessage(format!("[Alle] {}", text)),
            );
        }

        Ok(())
    }

    /// Verteilt die aktuelle Praesenz-Liste an alle Clients
    pub fn benutzer_liste_senden(&self) {
        let snapshot = self.state.registry.snapshot();
        self.state
            .router
            .dispatch(Ziel::Alle, ClientEvent::UpdateUserList(snapshot));
    }

    /// Verteilt die aktuelle Raum-Liste an alle Clients
    pub async fn raum_liste_senden(&self) -> HubResult<()> {
        let raeume = self.state.raum_repo.alle().await?;
        let liste = raeume.iter().map(|r| r.als_info()).collect();
        self.state
            .router
            .dispatch(Ziel::Alle, ClientEvent::RoomList(liste));
        Ok(())
    }

    /// Gibt die Verbindungs-ID dieser Session zurueck
    pub fn verbindung(&self) -> ConnectionId {
        self.verbindung
    }

    /// Gibt die Identitaet dieser Session zurueck
    pub fn identitaet(&self) -> &Identity {
        &self.identitaet
    }
}
