//! Unit tests for the command table and packet format.

use simple_step::protocol::{Command, CommandId, Packet, PayloadKind, Update, Value, PACKET_SIZE};

/// Test the request bytes for each payload width.
#[test]
fn test_request_encoding() {
    assert_eq!(
        Command::SetPositionSetpoint(-1).encode(Update::Apply).to_bytes(),
        [1, 200, 0xFF, 0xFF, 0xFF, 0xFF]
    );
    assert_eq!(
        Command::SetTravelVelocity(0x1234).encode(Update::Skip).to_bytes(),
        [10, 201, 0x34, 0x12, 0, 0]
    );
    assert_eq!(
        Command::SetDioHigh(5).encode(Update::Skip).to_bytes(),
        [21, 201, 5, 0, 0, 0]
    );
    assert_eq!(Command::GetPosition.encode(Update::Skip).to_bytes(), [0, 201, 0, 0, 0, 0]);
}

/// Test that getters and their setters report the same payload type.
#[test]
fn test_setter_and_getter_kinds_agree() {
    let pairs = [
        (CommandId::SetPositionSetpoint, CommandId::GetPositionSetpoint),
        (CommandId::SetVelocitySetpoint, CommandId::GetVelocitySetpoint),
        (CommandId::SetDirectionSetpoint, CommandId::GetDirectionSetpoint),
        (CommandId::SetMode, CommandId::GetMode),
        (CommandId::SetTravelVelocity, CommandId::GetTravelVelocity),
        (CommandId::SetStatus, CommandId::GetStatus),
        (CommandId::SetEnable, CommandId::GetEnable),
        (CommandId::SetInterlock, CommandId::GetInterlock),
    ];
    for (set, get) in pairs {
        assert_eq!(set.response_kind(), get.response_kind(), "{:?}", set);
    }
}

/// Test ids outside the table do not decode.
#[test]
fn test_gaps_in_id_space() {
    let known: Vec<u8> = CommandId::ALL.iter().map(|id| id.as_u8()).collect();
    for id in 0..=u8::MAX {
        let decoded = Command::decode(&Packet::new(id, 0));
        assert_eq!(decoded.is_some(), known.contains(&id), "id {}", id);
    }
}

/// Test response decoding by tag.
#[test]
fn test_response_decoding() {
    let bytes: [u8; PACKET_SIZE] = [12, PayloadKind::I32 as u8, 0x9C, 0xFF, 0xFF, 0xFF];
    let packet = Packet::from_bytes(&bytes);
    assert_eq!(packet.value(), Ok(Value::I32(-100)));
}
