use railcode_core::testbits::BitWriter;

/// Encodes a fully-populated flexible-content ticket payload: issuer block,
/// one traveler, an open ticket, a reservation with a token, and a control
/// block. Kept in one place so the end-to-end and golden tests agree on the
/// wire content.
pub fn full_ticket_payload() -> Vec<u8> {
    let mut writer = BitWriter::new();

    // Root preamble: traveler, documents and control all present.
    writer.write_bits(0b111, 3);

    // IssuingDetail: issuerNum, issuingTime, issuerName, issuerPNR present.
    writer
        .write_bits(0b0111_0010, 8)
        .write_constrained(3509, 1, 32_000)
        .write_constrained(2026, 2016, 2269)
        .write_constrained(150, 1, 366)
        .write_constrained(810, 0, 1439)
        .write_utf8("Example Rail")
        .write_bit(false) // specimen
        .write_bit(false) // securePaperTicket
        .write_bit(true) // activated
        .write_ia5("PNR12345", 0, 0);

    // TravelerDetail: travelers and preferredLanguage present.
    writer.write_bits(0b110, 3).write_length(1);
    // Traveler: firstName, lastName, passengerType, yearOfBirth present.
    writer
        .write_bits(0b110101, 6)
        .write_utf8("Alice")
        .write_utf8("Martin")
        .write_bit(true) // ticketHolder
        .write_bit(false) // enum extension marker
        .write_constrained(0, 0, 7) // adult
        .write_constrained(1990, 1901, 2155);
    writer.write_ia5("fr", 2, 2);

    // Two transport documents.
    writer.write_length(2);

    // Document 1: no token, open ticket.
    writer
        .write_bit(false)
        .write_bit(false) // choice extension marker
        .write_constrained(1, 0, 3)
        // OpenTicket: reference, classCode, fromStationNum, toStationNum,
        // infoText present.
        .write_bits(0b1110101, 7)
        .write_ia5("OT-2026-0001", 0, 0)
        .write_bit(false)
        .write_constrained(2, 0, 7) // second
        .write_constrained(8_100_001, 1, 9_999_999)
        .write_constrained(8_700_005, 1, 9_999_999)
        .write_constrained(0, 0, 700)
        .write_constrained(2, 0, 700)
        .write_bit(false) // returnIncluded
        .write_utf8("Via Brenner");

    // Document 2: token, reservation with places.
    writer
        .write_bit(true)
        .write_bit(false) // token provider absent
        .write_octets(&[0xca, 0xfe])
        .write_bit(false)
        .write_constrained(0, 0, 3)
        // Reservation: trainNum, classCode, places present.
        .write_bits(0b1000_0011, 8)
        .write_constrained(421, 1, 99_999)
        .write_constrained(1, 0, 700)
        .write_bit(false)
        .write_constrained(1, 0, 7) // first
        .write_bits(0b11, 2)
        .write_ia5("7", 0, 0)
        .write_length(2)
        .write_ia5("41", 0, 0)
        .write_ia5("42", 0, 0);

    // ControlDetail: randomDetailedValidationRequired present.
    writer
        .write_bits(0b10, 2)
        .write_bit(true)
        .write_bit(false)
        .write_bit(false)
        .write_constrained(10, 0, 99)
        .write_bit(false) // passportValidationRequired
        .write_bit(false); // ticketOnDeparture

    writer.finish()
}

/// Wraps `payload` in an envelope with the given version tag and format id.
pub fn envelope_bytes(version: &str, format: &str, payload: &[u8]) -> Vec<u8> {
    let mut writer = BitWriter::new();
    writer
        .write_ia5(version, 2, 2)
        .write_ia5(format, 0, 0)
        .write_octets(payload);
    writer.finish()
}
