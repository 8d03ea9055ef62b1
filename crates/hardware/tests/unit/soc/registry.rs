//! # Device Registry Tests

use armv2_core::common::Status;
use armv2_core::common::constants::HW_DEVICES_MAX;
use armv2_core::soc::{DeviceTable, HardwareMapping, Region};
use armv2_core::{Cpu, Keyboard};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::mocks::device::MockDevice;

#[test]
fn test_add_assigns_sequential_indices_up_to_the_limit() {
    let mut table = DeviceTable::new();
    assert!(table.is_empty());
    for expected in 0..HW_DEVICES_MAX {
        assert_eq!(table.add(Box::new(Keyboard::new())), Ok(expected));
    }
    assert_eq!(
        table.add(Box::new(Keyboard::new())),
        Err(Status::MaxHardwareDevices)
    );
    assert_eq!(table.len(), HW_DEVICES_MAX);
}

#[test]
fn test_identity_is_captured_at_registration() {
    let mut mock = MockDevice::new();
    mock.expect_device_id().times(1).return_const(0xfeed_u32);
    mock.expect_interrupt_flag_addr().times(1).return_const(0x40_u32);
    let mut table = DeviceTable::new();

    let index = table.add(Box::new(mock)).unwrap();

    let entry = table.get(index).unwrap();
    assert_eq!(entry.device_id(), 0xfeed);
    assert_eq!(entry.interrupt_flag_addr(), 0x40);
    assert_eq!(entry.mapped(), None);
    assert!(table.get(index + 1).is_none());
}

#[test]
fn test_mappings_are_logged_newest_first() {
    let mut cpu = Cpu::new(1 << 20).unwrap();
    let first = cpu.add_hardware(Box::new(Keyboard::new())).unwrap();
    let second = cpu.add_hardware(Box::new(Keyboard::new())).unwrap();

    cpu.map_memory(first, 0x1_0000, 0x1_1000).unwrap();
    cpu.map_memory(second, 0x2_0000, 0x2_2000).unwrap();

    assert_eq!(
        cpu.mappings(),
        &[
            HardwareMapping {
                device: second,
                start: 0x2_0000,
                end: 0x2_2000,
                flags: 0,
            },
            HardwareMapping {
                device: first,
                start: 0x1_0000,
                end: 0x1_1000,
                flags: 0,
            },
        ]
    );
    assert_eq!(
        cpu.devices().get(second).unwrap().mapped(),
        Some(Region {
            start: 0x2_0000,
            end: 0x2_2000
        })
    );
}

#[rstest]
#[case::start(0x1000, true)]
#[case::inside(0x1ffc, true)]
#[case::end_is_exclusive(0x2000, false)]
#[case::below(0x0fff, false)]
fn test_region_contains(#[case] addr: u32, #[case] expected: bool) {
    let region = Region {
        start: 0x1000,
        end: 0x2000,
    };
    assert_eq!(region.contains(addr), expected);
}
