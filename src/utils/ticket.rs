// utils/ticket.rs
use std::{
    collections::HashSet,
    sync::Mutex,
};

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

const TICKET_PREFIX: &str = "COMP";
const MAX_ATTEMPTS: usize = 64;

/// Issues `COMP-YYYYMMDD-XXXXXX` ticket numbers. Every number handed out for
/// the current UTC day is remembered, so a run never repeats one.
#[derive(Debug)]
pub struct TicketGenerator {
    issued: Mutex<IssuedTickets>,
}

#[derive(Debug)]
struct IssuedTickets {
    day: Option<NaiveDate>,
    numbers: HashSet<String>,
}

impl Default for TicketGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketGenerator {
    pub fn new() -> Self {
        TicketGenerator {
            issued: Mutex::new(IssuedTickets {
                day: None,
                numbers: HashSet::new(),
            }),
        }
    }

    pub fn next(&self) -> Result<String, String> {
        self.next_at(Utc::now())
    }

    pub fn next_at(&self, now: DateTime<Utc>) -> Result<String, String> {
        let today = now.date_naive();
        let mut issued = self
            .issued
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if issued.day != Some(today) {
            issued.day = Some(today);
            issued.numbers.clear();
        }

        let mut rng = rand::rng();
        for _ in 0..MAX_ATTEMPTS {
            let candidate = format_ticket(today, random_suffix(&mut rng));
            if issued.numbers.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }

        Err(format!(
            "Could not allocate a unique ticket number for {}",
            today.format("%Y%m%d")
        ))
    }

    /// Releases a number whose insert was rolled back.
    pub fn forget(&self, ticket_number: &str) {
        let mut issued = self
            .issued
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        issued.numbers.remove(ticket_number);
    }
}

fn random_suffix<R: Rng>(rng: &mut R) -> [u8; 3] {
    let mut bytes = [0u8; 3];
    rng.fill(&mut bytes);
    bytes
}

fn format_ticket(day: NaiveDate, suffix: [u8; 3]) -> String {
    format!(
        "{}-{}-{}",
        TICKET_PREFIX,
        day.format("%Y%m%d"),
        hex::encode_upper(suffix)
    )
}

#[cfg(test)]
pub(crate) fn is_ticket_number(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    parts.len() == 3
        && parts[0] == TICKET_PREFIX
        && parts[1].len() == 8
        && parts[1].chars().all(|c| c.is_ascii_digit())
        && parts[2].len() == 6
        && parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_ticket(day, [0x0a, 0xbc, 0xff]), "COMP-20240309-0ABCFF");
    }

    #[test]
    fn test_generated_numbers_match_pattern() {
        let generator = TicketGenerator::new();
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap();
        let ticket = generator.next_at(now).unwrap();

        assert!(ticket.starts_with("COMP-20241231-"));
        assert!(is_ticket_number(&ticket), "bad ticket {}", ticket);
        assert!(!is_ticket_number("COMP-2024123-ABCDEF"));
        assert!(!is_ticket_number("COMP-20241231-abcdef"));
    }

    #[test]
    fn test_sequential_numbers_are_unique() {
        let generator = TicketGenerator::new();
        let now = Utc::now();
        let mut seen = HashSet::new();

        for _ in 0..20_000 {
            let ticket = generator.next_at(now).unwrap();
            assert!(seen.insert(ticket), "duplicate ticket issued");
        }
    }

    #[test]
    fn test_day_rollover_uses_new_date() {
        let generator = TicketGenerator::new();
        let day_one = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let day_two = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 1).unwrap();

        assert!(generator.next_at(day_one).unwrap().starts_with("COMP-20240101-"));
        assert!(generator.next_at(day_two).unwrap().starts_with("COMP-20240102-"));
    }

    #[test]
    fn test_forget_releases_number() {
        let generator = TicketGenerator::new();
        let ticket = generator.next().unwrap();
        generator.forget(&ticket);

        let issued = generator.issued.lock().unwrap();
        assert!(!issued.numbers.contains(&ticket));
    }
}
