//! In-memory registry of issued quiz challenges.
//!
//! The answer key never leaves the server: clients receive a challenge id and
//! hand it back with their pick. A challenge can be redeemed once and expires
//! after a configurable time to live.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::QuizChallenge;

/// Length of generated challenge ids
const CHALLENGE_ID_LEN: usize = 32;

/// Purge expired entries once this many challenges are outstanding
const CLEANUP_THRESHOLD: usize = 256;

struct ChallengeEntry {
  challenge: QuizChallenge,
  issued_at: DateTime<Utc>,
}

pub struct ChallengeRegistry {
  entries: Mutex<HashMap<String, ChallengeEntry>>,
  ttl: Duration,
}

impl ChallengeRegistry {
  pub fn new(ttl: Duration) -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
      ttl,
    }
  }

  /// A poisoned lock only means another request panicked mid-insert; the
  /// map itself is still usable.
  fn lock(&self) -> MutexGuard<'_, HashMap<String, ChallengeEntry>> {
    self.entries.lock().unwrap_or_else(|poisoned| {
      tracing::warn!("Challenge registry lock poisoned, recovering");
      poisoned.into_inner()
    })
  }

  /// Store a challenge and return the id the client must answer with.
  pub fn issue(&self, challenge: QuizChallenge, now: DateTime<Utc>) -> String {
    let mut entries = self.lock();
    if entries.len() >= CLEANUP_THRESHOLD {
      self.purge_expired(&mut entries, now);
    }

    let mut id = generate_challenge_id();
    while entries.contains_key(&id) {
      id = generate_challenge_id();
    }
    entries.insert(
      id.clone(),
      ChallengeEntry {
        challenge,
        issued_at: now,
      },
    );
    id
  }

  /// Take a challenge out of the registry. Unknown, already used and expired
  /// ids all come back as `None`.
  pub fn redeem(&self, challenge_id: &str, now: DateTime<Utc>) -> Option<QuizChallenge> {
    let entry = self.lock().remove(challenge_id)?;
    if now - entry.issued_at > self.ttl {
      tracing::debug!("Challenge {} expired", challenge_id);
      return None;
    }
    Some(entry.challenge)
  }

  /// Number of outstanding challenges, expired ones included until purged
  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn purge_expired(&self, entries: &mut HashMap<String, ChallengeEntry>, now: DateTime<Utc>) {
    let before = entries.len();
    entries.retain(|_, entry| now - entry.issued_at <= self.ttl);
    tracing::debug!("Purged {} expired challenges", before - entries.len());
  }
}

/// Random lowercase alphanumeric id
pub fn generate_challenge_id() -> String {
  let mut rng = rand::rng();
  (0..CHALLENGE_ID_LEN)
    .map(|_| {
      let idx = rng.random_range(0..36u8);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::QuizOption;

  fn challenge(correct_id: i64) -> QuizChallenge {
    QuizChallenge {
      correct_id,
      prompt: "📦 Apple".to_string(),
      options: vec![QuizOption {
        word_id: correct_id,
        text: "사과".to_string(),
      }],
      issued_level: 0,
      issued_reviewed_at: Utc::now(),
    }
  }

  #[test]
  fn test_challenge_id_shape() {
    let id = generate_challenge_id();
    assert_eq!(id.len(), CHALLENGE_ID_LEN);
    assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_ne!(id, generate_challenge_id());
  }

  #[test]
  fn test_redeem_is_single_use() {
    let registry = ChallengeRegistry::new(Duration::minutes(30));
    let now = Utc::now();
    let id = registry.issue(challenge(1), now);

    assert_eq!(registry.redeem(&id, now).map(|c| c.correct_id), Some(1));
    assert!(registry.redeem(&id, now).is_none());
    assert!(registry.is_empty());
  }

  #[test]
  fn test_redeem_unknown_id() {
    let registry = ChallengeRegistry::new(Duration::minutes(30));
    assert!(registry.redeem("nope", Utc::now()).is_none());
  }

  #[test]
  fn test_expired_challenge_is_rejected_and_dropped() {
    let registry = ChallengeRegistry::new(Duration::minutes(30));
    let now = Utc::now();
    let id = registry.issue(challenge(1), now);

    assert!(registry.redeem(&id, now + Duration::minutes(31)).is_none());
    assert!(registry.is_empty());
  }

  #[test]
  fn test_purge_runs_when_registry_fills_up() {
    let registry = ChallengeRegistry::new(Duration::minutes(30));
    let old = Utc::now() - Duration::hours(2);
    for i in 0..CLEANUP_THRESHOLD {
      registry.issue(challenge(i as i64), old);
    }
    assert_eq!(registry.len(), CLEANUP_THRESHOLD);

    let fresh = registry.issue(challenge(999), Utc::now());
    assert_eq!(registry.len(), 1);
    assert!(registry.redeem(&fresh, Utc::now()).is_some());
  }
}
