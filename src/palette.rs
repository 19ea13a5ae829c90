//! Fixed category colors
//!
//! Charts color statuses and link notes from static tables. Values outside
//! the tables get [`FALLBACK_COLOR`] instead of whatever the chart library
//! would pick, so an unexpected category is visibly "other" rather than
//! silently sharing a color with a known one.

use crate::dataset::Status;

/// Chart color for categories missing from the tables
pub const FALLBACK_COLOR: &str = "gray";

/// Chart color for a status
pub fn status_color(status: &Status) -> &'static str {
    match status {
        Status::Automatic => "green",
        Status::Manual => "blue",
        Status::Pending => "yellow",
        Status::LinkedWithDifference => "red",
        Status::Other(_) => FALLBACK_COLOR,
    }
}

/// Lighter cell background for the companies table. Unknown statuses are
/// left unstyled.
pub fn status_background(status: &Status) -> Option<&'static str> {
    match status {
        Status::Automatic => Some("lightgreen"),
        Status::Manual => Some("lightblue"),
        Status::Pending => Some("yellow"),
        Status::LinkedWithDifference => Some("lightcoral"),
        Status::Other(_) => None,
    }
}

/// Known discrepancy reasons recorded in `Observação do Vínculo`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkNoteKind {
    DocumentNumberAndPayerId,
    DocumentNumber,
    PayerId,
}

impl LinkNoteKind {
    pub const ALL: [LinkNoteKind; 3] = [
        LinkNoteKind::DocumentNumberAndPayerId,
        LinkNoteKind::DocumentNumber,
        LinkNoteKind::PayerId,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LinkNoteKind::DocumentNumberAndPayerId => {
                "Número do documento diferente, Cnpj/Cpf do cedente"
            }
            LinkNoteKind::DocumentNumber => "Número do documento diferente",
            LinkNoteKind::PayerId => "Cnpj/Cpf do cedente diferente",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    pub fn color(self) -> &'static str {
        match self {
            LinkNoteKind::DocumentNumberAndPayerId => "purple",
            LinkNoteKind::DocumentNumber => "red",
            LinkNoteKind::PayerId => "blue",
        }
    }
}

/// Chart color for a link note
pub fn note_color(note: &str) -> &'static str {
    LinkNoteKind::from_label(note)
        .map(LinkNoteKind::color)
        .unwrap_or(FALLBACK_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(&Status::Automatic), "green");
        assert_eq!(status_color(&Status::Manual), "blue");
        assert_eq!(status_color(&Status::Pending), "yellow");
        assert_eq!(status_color(&Status::LinkedWithDifference), "red");
    }

    #[test]
    fn test_unknown_status_uses_fallback() {
        let other = Status::Other("Cancelado".to_string());
        assert_eq!(status_color(&other), FALLBACK_COLOR);
        assert_eq!(status_background(&other), None);
    }

    #[test]
    fn test_table_palette_is_distinct_from_chart_palette() {
        for status in [Status::Automatic, Status::Manual, Status::LinkedWithDifference] {
            assert_ne!(status_background(&status), Some(status_color(&status)));
        }
    }

    #[test]
    fn test_note_colors() {
        assert_eq!(note_color("Número do documento diferente"), "red");
        assert_eq!(note_color("Cnpj/Cpf do cedente diferente"), "blue");
        assert_eq!(
            note_color("Número do documento diferente, Cnpj/Cpf do cedente"),
            "purple"
        );
        assert_eq!(note_color("Valor diferente"), FALLBACK_COLOR);
    }

    #[test]
    fn test_note_kind_labels_round_trip() {
        for kind in LinkNoteKind::ALL {
            assert_eq!(LinkNoteKind::from_label(kind.label()), Some(kind));
        }
    }
}
