use dadar_core::SourceType;

/// Background colour of a result's type badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Blue,
    Green,
    Purple,
    Orange,
    Grey,
}

impl BadgeColor {
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            BadgeColor::Blue => "#e3f2fd",
            BadgeColor::Green => "#e8f5e9",
            BadgeColor::Purple => "#f3e5f5",
            BadgeColor::Orange => "#fff3e0",
            BadgeColor::Grey => "#f5f5f5",
        }
    }
}

#[must_use]
pub fn badge_color(source_type: SourceType) -> BadgeColor {
    match source_type {
        SourceType::Hotel => BadgeColor::Blue,
        SourceType::Shop => BadgeColor::Green,
        SourceType::Place => BadgeColor::Purple,
        SourceType::Event => BadgeColor::Orange,
        _ => BadgeColor::Grey,
    }
}

/// Badge text, e.g. `HOTEL`.
#[must_use]
pub fn badge_label(source_type: SourceType) -> String {
    source_type.as_str().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_source_type_has_a_color() {
        for t in SourceType::ALL {
            assert!(badge_color(t).hex().starts_with('#'));
        }
    }

    #[test]
    fn dedicated_colors() {
        assert_eq!(badge_color(SourceType::Hotel), BadgeColor::Blue);
        assert_eq!(badge_color(SourceType::Shop), BadgeColor::Green);
        assert_eq!(badge_color(SourceType::Place), BadgeColor::Purple);
        assert_eq!(badge_color(SourceType::Event), BadgeColor::Orange);
    }

    #[test]
    fn news_and_blog_fall_back_to_grey() {
        assert_eq!(badge_color(SourceType::News), BadgeColor::Grey);
        assert_eq!(badge_color(SourceType::Blog), BadgeColor::Grey);
        assert_eq!(BadgeColor::Grey.hex(), "#f5f5f5");
    }

    #[test]
    fn labels_are_uppercase_tags() {
        assert_eq!(badge_label(SourceType::Place), "PLACE");
        assert_eq!(badge_label(SourceType::News), "NEWS");
    }
}
