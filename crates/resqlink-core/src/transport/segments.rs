//! Splitting long messages into concatenated SMS parts.
//!
//! A message that fits the GSM 03.38 alphabet is measured in septets, with
//! extension-table characters taking two. Anything else goes out as UCS-2
//! and is measured in UTF-16 code units.

/// GSM 03.38 default alphabet.
const GSM7_BASIC: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?\
¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";

/// Characters sent through the escape to the extension table.
const GSM7_EXTENSION: &str = "\u{c}^{}\\[~]|€";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsEncoding {
    Gsm7,
    Ucs2,
}

impl SmsEncoding {
    /// The encoding the carrier will need for `message`.
    pub fn of(message: &str) -> Self {
        if message
            .chars()
            .all(|ch| GSM7_BASIC.contains(ch) || GSM7_EXTENSION.contains(ch))
        {
            SmsEncoding::Gsm7
        } else {
            SmsEncoding::Ucs2
        }
    }

    /// Longest body that still goes out as one plain SMS.
    pub fn single_limit(self) -> usize {
        match self {
            SmsEncoding::Gsm7 => 160,
            SmsEncoding::Ucs2 => 70,
        }
    }

    /// Room left in each part once the concatenation header is added.
    pub fn part_limit(self) -> usize {
        match self {
            SmsEncoding::Gsm7 => 153,
            SmsEncoding::Ucs2 => 67,
        }
    }

    /// Size of `ch` in this encoding's units.
    pub fn width(self, ch: char) -> usize {
        match self {
            SmsEncoding::Gsm7 if GSM7_EXTENSION.contains(ch) => 2,
            SmsEncoding::Gsm7 => 1,
            SmsEncoding::Ucs2 => ch.len_utf16(),
        }
    }

    pub fn units(self, message: &str) -> usize {
        message.chars().map(|ch| self.width(ch)).sum()
    }
}

/// Divide `message` into SMS parts. A character is never split, so neither
/// are surrogate pairs or GSM escape sequences.
pub fn sms_parts(message: &str) -> Vec<String> {
    let encoding = SmsEncoding::of(message);
    if encoding.units(message) <= encoding.single_limit() {
        return vec![message.to_string()];
    }

    let limit = encoding.part_limit();
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut units = 0;
    for ch in message.chars() {
        let width = encoding.width(ch);
        if units + width > limit {
            parts.push(std::mem::take(&mut current));
            units = 0;
        }
        current.push(ch);
        units += width;
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Coordinates;
    use crate::message::compose_alert_message;

    #[test]
    fn encoding_follows_alphabet() {
        assert_eq!(SmsEncoding::of("Help at 5th & Main, 10:30 PM"), SmsEncoding::Gsm7);
        assert_eq!(SmsEncoding::of("price €5 [approx]"), SmsEncoding::Gsm7);
        assert_eq!(SmsEncoding::of("🚨 help"), SmsEncoding::Ucs2);
        assert_eq!(SmsEncoding::of("Привет"), SmsEncoding::Ucs2);
    }

    #[test]
    fn short_message_is_single_part() {
        assert_eq!(sms_parts("help"), vec!["help".to_string()]);
        assert_eq!(sms_parts(&"x".repeat(160)).len(), 1);
        assert_eq!(sms_parts(&"ж".repeat(70)).len(), 1);
    }

    #[test]
    fn gsm_message_splits_at_153() {
        let msg = "y".repeat(161);
        let parts = sms_parts(&msg);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 153);
        assert_eq!(parts.concat(), msg);
    }

    #[test]
    fn extension_characters_count_twice() {
        assert_eq!(sms_parts(&"{".repeat(80)).len(), 1);

        let parts = sms_parts(&"{".repeat(81));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].chars().count(), 76);
        assert_eq!(parts[1].chars().count(), 5);
    }

    #[test]
    fn ucs2_message_splits_at_67() {
        let msg = "ж".repeat(71);
        let parts = sms_parts(&msg);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].chars().count(), 67);
        assert_eq!(parts[1].chars().count(), 4);
    }

    #[test]
    fn emoji_are_not_split_across_parts() {
        // 66 units then a two-unit emoji that cannot fit in part one.
        let msg = format!("{}🚨{}", "a".repeat(66), "b".repeat(20));
        let parts = sms_parts(&msg);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "a".repeat(66));
        assert!(parts[1].starts_with('🚨'));
    }

    #[test]
    fn alert_message_fits_ucs2_parts() {
        let sydney = Coordinates::new(-33.8688, 151.2093);
        let msg = compose_alert_message("12/25/2026, 12:30:00 AM", Some(&sydney));
        assert_eq!(SmsEncoding::of(&msg), SmsEncoding::Ucs2);

        let parts = sms_parts(&msg);
        assert!(parts.len() > 1);
        assert!(parts.iter().all(|p| p.encode_utf16().count() <= 67));
        assert_eq!(parts.concat(), msg);
    }
}
