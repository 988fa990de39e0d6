//! Unit tests for per-chunk retry and failure reporting

use crate::common::{create_mock_driver, create_mock_interface, pattern};
use embedded_hal::i2c::ErrorKind;
use n76e003::{Config, DEFAULT_ADDRESS, Error, RetryPolicy};

#[test]
fn test_transient_failure_is_absorbed() {
    let (mut interface, bus, delay) = create_mock_interface(Config::default());

    // Two failures, third attempt succeeds
    bus.fail_next(2);
    interface.write_registers(0x01, &[0x55]).unwrap();

    assert_eq!(bus.attempts_at(0x01), 3);
    assert_eq!(bus.register(0x01), 0x55);
    assert_eq!(delay.sleeps(), vec![2_000, 2_000]);
}

#[test]
fn test_exhausted_chunk_aborts_write() {
    let config = Config::new().with_max_transfer(5);
    let (mut interface, bus, delay) = create_mock_interface(config);

    // Chunks start at 0x20, 0x24, 0x28, 0x2C; the second one never gets through
    bus.fail_register(0x24);
    let data = pattern(16);
    let result = interface.write_registers(0x20, &data);

    assert_eq!(
        result,
        Err(Error::Transfer {
            address: DEFAULT_ADDRESS,
            register: 0x24,
            len: 16,
            source: ErrorKind::Bus,
        })
    );

    // Exactly three attempts at the failing chunk, nothing after it
    assert_eq!(bus.attempts_at(0x20), 1);
    assert_eq!(bus.attempts_at(0x24), 3);
    assert_eq!(bus.attempts_at(0x28), 0);
    assert_eq!(bus.attempts_at(0x2C), 0);
    assert_eq!(bus.transactions().len(), 4);

    // No sleep after the final attempt
    assert_eq!(delay.sleeps(), vec![2_000, 2_000]);

    // The first chunk stays committed, no rollback
    assert_eq!(bus.registers(0x20, 4), data[..4].to_vec());
    assert_eq!(bus.registers(0x24, 12), vec![0u8; 12]);
}

#[test]
fn test_exhausted_chunk_aborts_read_with_partial_result() {
    let config = Config::new().with_max_transfer(4);
    let (mut interface, bus, _delay) = create_mock_interface(config);
    bus.fill_pattern(0x30, 12);
    bus.fail_register(0x34);

    let mut buf = [0xEEu8; 12];
    let result = interface.read_registers(0x30, &mut buf);

    assert!(matches!(
        result,
        Err(Error::Transfer {
            register: 0x34,
            len: 12,
            ..
        })
    ));
    assert_eq!(bus.attempts_at(0x34), 3);
    assert_eq!(bus.attempts_at(0x38), 0);

    // First chunk is visible, the failing chunk's range is untouched
    assert_eq!(buf[..4].to_vec(), bus.registers(0x30, 4));
    assert_eq!(buf[4..], [0xEE; 8]);
}

#[test]
fn test_retry_budget_is_per_chunk() {
    let config = Config::new().with_max_transfer(3);
    let (mut interface, bus, delay) = create_mock_interface(config);

    // Every chunk fails twice before succeeding; a shared budget would run out
    for register in [0x60, 0x62, 0x64] {
        bus.fail_register_times(register, 2);
    }
    let data = pattern(6);
    interface.write_registers(0x60, &data).unwrap();

    assert_eq!(bus.attempts_at(0x60), 3);
    assert_eq!(bus.attempts_at(0x62), 3);
    assert_eq!(bus.attempts_at(0x64), 3);
    assert_eq!(bus.failures(), 6);
    assert_eq!(delay.sleeps().len(), 6);
    assert_eq!(bus.registers(0x60, 6), data);
}

#[test]
fn test_custom_retry_policy() {
    let config = Config::new().with_retry(RetryPolicy::new(5, 100));
    let (mut interface, bus, delay) = create_mock_interface(config);

    bus.fail_register(0x02);
    let result = interface.write_registers(0x02, &[0, 0, 0, 1]);

    assert!(matches!(result, Err(Error::Transfer { register: 0x02, .. })));
    assert_eq!(bus.attempts_at(0x02), 5);
    assert_eq!(delay.sleeps(), vec![100; 4]);
}

#[test]
fn test_recovery_after_failed_operation() {
    let (mut driver, bus, _delay) = create_mock_driver();

    bus.fail_register(0x01);
    assert!(driver.heartbeat().is_err());
    assert_eq!(bus.attempts_at(0x01), 3);

    // The caller decides to try again once the bus is healthy
    bus.heal_register(0x01);
    driver.heartbeat().unwrap();
    assert_eq!(bus.register(0x01), 0x55);
}

#[test]
fn test_protocol_errors_propagate_unchanged() {
    let (mut driver, bus, _delay) = create_mock_driver();

    bus.fail_register(0x04);
    let result = driver.set_watchdog_duration(30);

    assert_eq!(
        result,
        Err(Error::Transfer {
            address: DEFAULT_ADDRESS,
            register: 0x04,
            len: 2,
            source: ErrorKind::Bus,
        })
    );
    // The protocol layer adds no retries of its own
    assert_eq!(bus.attempts_at(0x04), 3);
}

#[test]
fn test_error_display() {
    let error: Error<ErrorKind> = Error::Transfer {
        address: 0x61,
        register: 0x02,
        len: 4,
        source: ErrorKind::Bus,
    };
    let text = error.to_string();
    assert!(text.contains("0x61"), "{text}");
    assert!(text.contains("0x02"), "{text}");
    assert!(text.contains("size: 4"), "{text}");

    let mismatch: Error<ErrorKind> = Error::IdentityMismatch(0x12);
    assert!(mismatch.to_string().contains("0x12"));
}
