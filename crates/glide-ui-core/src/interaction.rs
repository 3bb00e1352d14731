//! How a rendered record responds to activation.

/// Interaction mode of one rendered record.
///
/// A non-empty link target always wins over a click handler; a record with neither is static.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Interaction {
    Link {
        href: String,
    },
    Action,
    #[default]
    Static,
}

/// What happened when the user activated a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    Navigate(String),
    Clicked,
    None,
}

impl Interaction {
    pub fn resolve(href: Option<&str>, has_click: bool) -> Self {
        match href {
            Some(h) if !h.is_empty() => Interaction::Link {
                href: h.to_string(),
            },
            _ if has_click => Interaction::Action,
            _ => Interaction::Static,
        }
    }

    pub fn is_interactive(&self) -> bool {
        !matches!(self, Interaction::Static)
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            Interaction::Link { href } => Some(href),
            _ => None,
        }
    }

    pub fn activate(&self) -> Activation {
        match self {
            Interaction::Link { href } => Activation::Navigate(href.clone()),
            Interaction::Action => Activation::Clicked,
            Interaction::Static => Activation::None,
        }
    }

    /// Accessible name for the record.
    ///
    /// An explicit label wins. Links fall back to `"View {title}"`, everything else to the title.
    pub fn aria_label(&self, explicit: Option<&str>, title: Option<&str>) -> Option<String> {
        if let Some(label) = explicit.filter(|l| !l.is_empty()) {
            return Some(label.to_string());
        }
        let title = title.filter(|t| !t.is_empty())?;
        match self {
            Interaction::Link { .. } => Some(format!("View {title}")),
            _ => Some(title.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_beats_click_handler() {
        assert_eq!(
            Interaction::resolve(Some("/a"), true),
            Interaction::Link {
                href: "/a".to_string()
            }
        );
        assert_eq!(Interaction::resolve(Some(""), true), Interaction::Action);
        assert_eq!(Interaction::resolve(None, false), Interaction::Static);
    }

    #[test]
    fn activation_follows_mode() {
        assert_eq!(
            Interaction::resolve(Some("/x"), false).activate(),
            Activation::Navigate("/x".to_string())
        );
        assert_eq!(Interaction::Action.activate(), Activation::Clicked);
        assert_eq!(Interaction::Static.activate(), Activation::None);
    }

    #[test]
    fn aria_label_fallbacks() {
        let link = Interaction::resolve(Some("/p"), false);
        assert_eq!(
            link.aria_label(None, Some("Pricing")).as_deref(),
            Some("View Pricing")
        );
        assert_eq!(
            Interaction::Action.aria_label(None, Some("Pricing")).as_deref(),
            Some("Pricing")
        );
        assert_eq!(
            link.aria_label(Some("Open"), Some("Pricing")).as_deref(),
            Some("Open")
        );
        assert_eq!(link.aria_label(None, None), None);
    }
}
