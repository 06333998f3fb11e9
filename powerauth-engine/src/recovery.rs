//! Recovery PUK consumption.
//!
//! Each PUK on a recovery code is single-use. Consumption runs under the
//! same kind of exclusive critical section as activation updates, keyed by
//! the recovery code.

use chrono::{DateTime, Utc};

use powerauth_crypto::Vault;
use powerauth_types::{RecoveryCode, RecoveryCodeStatus, RecoveryPukStatus};

use crate::EngineError;

/// Outcome of one PUK consumption attempt.
///
/// `AlreadyUsed` is deliberately distinct from `Invalid`: a client retrying
/// a lost response must learn that the PUK was spent, not that it was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PukConsumption {
    /// The PUK matched and is now marked used.
    Consumed,
    /// The PUK was correct at some point but has already been consumed.
    AlreadyUsed,
    /// The PUK does not exist, was invalidated, or the value did not match.
    Invalid,
}

/// Attempt to consume a PUK of an active recovery code.
///
/// A non-consuming outcome counts as a failed attempt; at
/// `max_failed_attempts` the whole code is blocked. The caller persists the
/// mutated code afterwards.
pub fn consume_puk(
    code: &mut RecoveryCode,
    puk_index: u64,
    claimed_puk: &[u8],
    vault: &Vault,
    now: DateTime<Utc>,
) -> Result<PukConsumption, EngineError> {
    if code.status != RecoveryCodeStatus::Active {
        return Err(EngineError::RecoveryCodeIncorrectState { status: code.status });
    }

    // Vault context binding the sealed PUK to this exact record.
    let index_text = puk_index.to_string();
    let context = [
        code.application_id.clone(),
        code.user_id.clone(),
        code.recovery_code.clone(),
        index_text,
    ];
    let context: Vec<&str> = context.iter().map(String::as_str).collect();

    let outcome = match code.puk(puk_index) {
        None => PukConsumption::Invalid,
        Some(puk) => match puk.status {
            RecoveryPukStatus::Used => PukConsumption::AlreadyUsed,
            RecoveryPukStatus::Invalid => PukConsumption::Invalid,
            RecoveryPukStatus::Valid => match vault.open(&puk.puk, &context) {
                Ok(stored) if stored == claimed_puk => PukConsumption::Consumed,
                Ok(_) => PukConsumption::Invalid,
                Err(err) => {
                    log::warn!(
                        "sealed PUK {puk_index} of recovery code for user {} failed to open: {err}",
                        code.user_id
                    );
                    PukConsumption::Invalid
                }
            },
        },
    };

    match outcome {
        PukConsumption::Consumed => {
            // SAFETY: the PUK was just looked up by the same index.
            let puk = code.puk_mut(puk_index).unwrap();
            puk.status = RecoveryPukStatus::Used;
            puk.timestamp_last_change = Some(now);
            code.failed_attempts = 0;
        }
        PukConsumption::AlreadyUsed | PukConsumption::Invalid => {
            code.failed_attempts += 1;
            if code.failed_attempts >= code.max_failed_attempts {
                code.status = RecoveryCodeStatus::Blocked;
                log::warn!(
                    "recovery code for user {} blocked after {} failed PUK attempts",
                    code.user_id,
                    code.failed_attempts
                );
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use powerauth_types::RecoveryPuk;

    use super::*;

    const APP: &str = "app-1";
    const USER: &str = "user-1";
    const CODE: &str = "AAAAA-BBBBB-CCCCC-DDDDD";

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap()
    }

    fn vault() -> Vault {
        Vault::new(Some(vec![0x24; 32]))
    }

    fn recovery_code(vault: &Vault, puk_values: &[&[u8]]) -> RecoveryCode {
        let puks = puk_values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let puk_index = u64::try_from(i).unwrap() + 1;
                RecoveryPuk {
                    puk_index,
                    puk: vault
                        .seal(value, &[APP, USER, CODE, &puk_index.to_string()])
                        .unwrap(),
                    status: RecoveryPukStatus::Valid,
                    timestamp_last_change: None,
                }
            })
            .collect();
        RecoveryCode {
            application_id: APP.into(),
            user_id: USER.into(),
            activation_id: None,
            recovery_code: CODE.into(),
            status: RecoveryCodeStatus::Active,
            failed_attempts: 0,
            max_failed_attempts: 3,
            timestamp_created: test_time(),
            puks,
        }
    }

    #[test]
    fn correct_puk_is_consumed_exactly_once() {
        let vault = vault();
        let mut code = recovery_code(&vault, &[b"0001112223", b"4445556667"]);

        let first = consume_puk(&mut code, 1, b"0001112223", &vault, test_time()).unwrap();
        assert_eq!(first, PukConsumption::Consumed);
        assert_eq!(code.puk(1).unwrap().status, RecoveryPukStatus::Used);
        assert_eq!(code.next_valid_puk_index(), Some(2));

        // The same PUK again: already used, not merely invalid.
        let second = consume_puk(&mut code, 1, b"0001112223", &vault, test_time()).unwrap();
        assert_eq!(second, PukConsumption::AlreadyUsed);
    }

    #[test]
    fn wrong_puk_value_is_invalid() {
        let vault = vault();
        let mut code = recovery_code(&vault, &[b"0001112223"]);
        let outcome = consume_puk(&mut code, 1, b"9999999999", &vault, test_time()).unwrap();
        assert_eq!(outcome, PukConsumption::Invalid);
        assert_eq!(code.failed_attempts, 1);
        assert_eq!(code.puk(1).unwrap().status, RecoveryPukStatus::Valid);
    }

    #[test]
    fn unknown_puk_index_is_invalid() {
        let vault = vault();
        let mut code = recovery_code(&vault, &[b"0001112223"]);
        let outcome = consume_puk(&mut code, 9, b"0001112223", &vault, test_time()).unwrap();
        assert_eq!(outcome, PukConsumption::Invalid);
    }

    #[test]
    fn failed_attempts_block_the_whole_code() {
        let vault = vault();
        let mut code = recovery_code(&vault, &[b"0001112223"]);

        for _ in 0..2 {
            consume_puk(&mut code, 1, b"0000000000", &vault, test_time()).unwrap();
            assert_eq!(code.status, RecoveryCodeStatus::Active);
        }
        consume_puk(&mut code, 1, b"0000000000", &vault, test_time()).unwrap();
        assert_eq!(code.status, RecoveryCodeStatus::Blocked);

        // A blocked code refuses further attempts outright.
        assert_eq!(
            consume_puk(&mut code, 1, b"0001112223", &vault, test_time()).unwrap_err(),
            EngineError::RecoveryCodeIncorrectState {
                status: RecoveryCodeStatus::Blocked
            }
        );
    }

    #[test]
    fn success_resets_the_failure_count() {
        let vault = vault();
        let mut code = recovery_code(&vault, &[b"0001112223"]);
        consume_puk(&mut code, 1, b"0000000000", &vault, test_time()).unwrap();
        assert_eq!(code.failed_attempts, 1);
        consume_puk(&mut code, 1, b"0001112223", &vault, test_time()).unwrap();
        assert_eq!(code.failed_attempts, 0);
    }
}
