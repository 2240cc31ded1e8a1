//! Szenario-Tests ueber alle Hub-Komponenten hinweg
