//! Domain name encoding and decoding, including compression pointers (RFC 1035 §4.1.4).

use super::reader::WireReader;
use rootwalk_domain::DomainError;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;

/// Hard ceiling on pointer jumps within one name; real messages need a handful at most.
const MAX_POINTER_HOPS: usize = 64;

const POINTER_MASK: u8 = 0xC0;

/// Appends `domain` in label form. Empty segments (a trailing root dot, or the root name
/// itself) are skipped, so `"example.com."` and `"example.com"` encode identically.
///
/// Accepts the escaped presentation form produced by [`decode_name`]: `\.` and `\\` stand for
/// a literal dot or backslash inside a label, `\DDD` for an arbitrary byte.
pub fn encode_name(buf: &mut Vec<u8>, domain: &str) -> Result<(), DomainError> {
    let mut encoded = Vec::with_capacity(domain.len() + 2);
    let mut label: Vec<u8> = Vec::new();
    let mut label_start = 0;
    let bytes = domain.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                push_label(&mut encoded, &label, &domain[label_start..i])?;
                label.clear();
                label_start = i + 1;
                i += 1;
            }
            b'\\' => {
                let (byte, consumed) = unescape(domain, i)?;
                label.push(byte);
                i += consumed;
            }
            b => {
                label.push(b);
                i += 1;
            }
        }
    }
    push_label(&mut encoded, &label, &domain[label_start..])?;
    encoded.push(0);

    if encoded.len() > MAX_NAME_LEN {
        return Err(DomainError::InvalidDomainName(format!(
            "'{}' encodes to {} bytes (maximum is {})",
            domain,
            encoded.len(),
            MAX_NAME_LEN
        )));
    }

    buf.extend_from_slice(&encoded);
    Ok(())
}

fn push_label(encoded: &mut Vec<u8>, label: &[u8], text: &str) -> Result<(), DomainError> {
    if label.is_empty() {
        return Ok(());
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(DomainError::LabelTooLong {
            label: text.to_string(),
            len: label.len(),
        });
    }
    encoded.push(label.len() as u8);
    encoded.extend_from_slice(label);
    Ok(())
}

/// Decodes the escape starting at `domain[at]` (a backslash); returns the byte and the number
/// of input bytes consumed.
fn unescape(domain: &str, at: usize) -> Result<(u8, usize), DomainError> {
    let rest = &domain.as_bytes()[at + 1..];

    if rest.len() >= 3 && rest[..3].iter().all(u8::is_ascii_digit) {
        let value = rest[..3]
            .iter()
            .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));
        return u8::try_from(value).map(|byte| (byte, 4)).map_err(|_| {
            DomainError::InvalidDomainName(format!(
                "'{}': escape \\{} is not a byte value",
                domain, value
            ))
        });
    }

    match rest.first() {
        Some(b) if !b.is_ascii_digit() => Ok((*b, 2)),
        _ => Err(DomainError::InvalidDomainName(format!(
            "'{}': incomplete escape at offset {}",
            domain, at
        ))),
    }
}

/// Appends one wire label in presentation form. Dots and backslashes are escaped with a
/// backslash; bytes outside printable ASCII become `\DDD`.
fn push_escaped(out: &mut String, label: &[u8]) {
    for &b in label {
        match b {
            b'.' | b'\\' => {
                out.push('\\');
                out.push(char::from(b));
            }
            0x21..=0x7E => out.push(char::from(b)),
            _ => out.push_str(&format!("\\{:03}", b)),
        }
    }
}

/// Strips a single trailing root dot, leaving an escaped final dot (`a\.`) alone.
pub fn trim_root(name: &str) -> &str {
    match name.strip_suffix('.') {
        Some(stripped) => {
            let backslashes = stripped.bytes().rev().take_while(|b| *b == b'\\').count();
            if backslashes % 2 == 0 {
                stripped
            } else {
                name
            }
        }
        None => name,
    }
}

/// Decodes the name at the reader's position and returns its labels joined with `.`
/// (the root name decodes to an empty string). Label bytes that would not survive that
/// form are escaped, so `encode_name` reproduces the exact wire labels.
///
/// Compression pointers are followed through the whole message. Each pointer must land
/// strictly before the previous jump target, so chains can only move towards the start of the
/// message and self-referencing or cyclic pointers are rejected instead of looping. On return
/// the reader sits right after the name as it appears in the record: past the terminator, or
/// past the two bytes of the first pointer.
pub fn decode_name(reader: &mut WireReader<'_>) -> Result<String, DomainError> {
    let message = reader.message();
    let mut pos = reader.position();
    let mut name = String::new();
    let mut wire_len = 0usize;
    let mut resume_at: Option<usize> = None;
    let mut jump_limit = pos;
    let mut hops = 0usize;

    loop {
        let len = *message.get(pos).ok_or_else(|| truncated_name(pos))?;

        match len & POINTER_MASK {
            0x00 if len == 0 => {
                pos += 1;
                break;
            }
            0x00 => {
                let start = pos + 1;
                let end = start + len as usize;
                let label = message.get(start..end).ok_or_else(|| truncated_name(pos))?;

                wire_len += label.len() + 1;
                if wire_len + 1 > MAX_NAME_LEN {
                    return Err(DomainError::MalformedMessage(format!(
                        "name at offset {} exceeds {} bytes",
                        reader.position(),
                        MAX_NAME_LEN
                    )));
                }

                if !name.is_empty() {
                    name.push('.');
                }
                push_escaped(&mut name, label);
                pos = end;
            }
            POINTER_MASK => {
                let low = *message.get(pos + 1).ok_or_else(|| truncated_name(pos))?;
                let target = (usize::from(len & !POINTER_MASK) << 8) | usize::from(low);

                if target >= jump_limit {
                    return Err(DomainError::MalformedMessage(format!(
                        "compression pointer at offset {} to {} does not point backwards",
                        pos, target
                    )));
                }

                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(DomainError::MalformedMessage(format!(
                        "more than {} compression pointers in one name",
                        MAX_POINTER_HOPS
                    )));
                }

                resume_at.get_or_insert(pos + 2);
                jump_limit = target;
                pos = target;
            }
            _ => {
                return Err(DomainError::MalformedMessage(format!(
                    "unsupported label type 0x{:02x} at offset {}",
                    len, pos
                )));
            }
        }
    }

    reader.seek(resume_at.unwrap_or(pos))?;
    Ok(name)
}

fn truncated_name(pos: usize) -> DomainError {
    DomainError::MalformedMessage(format!("name truncated at offset {}", pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(domain: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_name(&mut buf, domain).unwrap();
        buf
    }

    #[test]
    fn test_encode_name_layout() {
        assert_eq!(
            encoded("google.com"),
            b"\x06google\x03com\x00".to_vec()
        );
    }

    #[test]
    fn test_encode_ignores_trailing_dot_and_root() {
        assert_eq!(encoded("example.com."), encoded("example.com"));
        assert_eq!(encoded(""), vec![0]);
        assert_eq!(encoded("."), vec![0]);
    }

    #[test]
    fn test_label_boundary() {
        let max = "a".repeat(63);
        assert!(encode_name(&mut Vec::new(), &format!("{}.com", max)).is_ok());

        let too_long = "a".repeat(64);
        let err = encode_name(&mut Vec::new(), &format!("{}.com", too_long)).unwrap_err();
        assert_eq!(
            err,
            DomainError::LabelTooLong {
                label: too_long,
                len: 64
            }
        );
    }

    #[test]
    fn test_failed_encode_leaves_buffer_untouched() {
        let mut buf = vec![0xAA];
        let long = format!("ok.{}", "b".repeat(70));
        assert!(encode_name(&mut buf, &long).is_err());
        assert_eq!(buf, vec![0xAA]);
    }

    #[test]
    fn test_name_length_limit() {
        let label = "c".repeat(63);
        let name = vec![label.as_str(); 4].join(".");
        assert!(matches!(
            encode_name(&mut Vec::new(), &name),
            Err(DomainError::InvalidDomainName(_))
        ));
    }

    #[test]
    fn test_decode_plain_name_advances_past_terminator() {
        let mut buf = encoded("www.example.com");
        buf.extend_from_slice(&[0x00, 0x01]);
        let mut reader = WireReader::new(&buf);
        assert_eq!(decode_name(&mut reader).unwrap(), "www.example.com");
        assert_eq!(reader.read_u16().unwrap(), 1);
    }

    #[test]
    fn test_decode_root_name() {
        let buf = [0u8];
        let mut reader = WireReader::new(&buf);
        assert_eq!(decode_name(&mut reader).unwrap(), "");
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn test_pointer_restores_position_after_two_bytes() {
        let mut buf = encoded("example.com");
        let pointer_at = buf.len();
        buf.extend_from_slice(&[0x03, b'w', b'w', b'w', 0xC0, 0x00, 0xAB]);

        let mut reader = WireReader::new(&buf);
        reader.seek(pointer_at).unwrap();
        assert_eq!(decode_name(&mut reader).unwrap(), "www.example.com");
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
    }

    #[test]
    fn test_chained_pointers() {
        // 0: "com", 5: "example" -> 0, 15: "www" -> 5, 21: pointer -> 15
        let mut buf = encoded("com");
        buf.extend_from_slice(b"\x07example\xC0\x00");
        buf.extend_from_slice(b"\x03www\xC0\x05");
        buf.extend_from_slice(&[0xC0, 0x0F]);

        let mut reader = WireReader::new(&buf);
        reader.seek(21).unwrap();
        assert_eq!(decode_name(&mut reader).unwrap(), "www.example.com");
        assert_eq!(reader.position(), 23);
    }

    #[test]
    fn test_self_pointer_is_rejected() {
        let buf = [0xC0, 0x00];
        let mut reader = WireReader::new(&buf);
        assert!(matches!(
            decode_name(&mut reader),
            Err(DomainError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_pointer_loop_through_label_is_rejected() {
        // 0: "a" then pointer back to 0: backwards once, then forms a cycle.
        let buf = [0x01, b'a', 0xC0, 0x00];
        let mut reader = WireReader::new(&buf);
        reader.seek(0).unwrap();
        assert!(decode_name(&mut reader).is_err());
    }

    #[test]
    fn test_forward_pointer_is_rejected() {
        let buf = [0xC0, 0x02, 0x00];
        let mut reader = WireReader::new(&buf);
        assert!(decode_name(&mut reader).is_err());
    }

    #[test]
    fn test_truncated_label() {
        let buf = [0x05, b'a', b'b'];
        let mut reader = WireReader::new(&buf);
        assert!(decode_name(&mut reader).is_err());
    }

    #[test]
    fn test_missing_terminator() {
        let buf = [0x01, b'a'];
        let mut reader = WireReader::new(&buf);
        assert!(decode_name(&mut reader).is_err());
    }

    #[test]
    fn test_reserved_label_type() {
        let buf = [0x41, b'a', 0x00];
        let mut reader = WireReader::new(&buf);
        assert!(decode_name(&mut reader).is_err());
    }

    #[test]
    fn test_dot_inside_label_round_trips() {
        let wire = b"\x03a.b\x03com\x00";
        let mut reader = WireReader::new(wire);
        let name = decode_name(&mut reader).unwrap();
        assert_eq!(name, "a\\.b.com");
        assert_eq!(encoded(&name), wire.to_vec());
    }

    #[test]
    fn test_binary_label_round_trips() {
        let wire = b"\x02\xff\xfe\x00";
        let mut reader = WireReader::new(wire);
        let name = decode_name(&mut reader).unwrap();
        assert_eq!(name, "\\255\\254");
        assert_eq!(encoded(&name), wire.to_vec());
    }

    #[test]
    fn test_backslash_and_space_are_escaped() {
        let wire = b"\x03a\\ \x00";
        let mut reader = WireReader::new(wire);
        let name = decode_name(&mut reader).unwrap();
        assert_eq!(name, "a\\\\\\032");
        assert_eq!(encoded(&name), wire.to_vec());
    }

    #[test]
    fn test_escaped_final_dot_is_kept() {
        assert_eq!(encoded("a\\."), b"\x02a.\x00".to_vec());
        assert_eq!(trim_root("a\\."), "a\\.");
        assert_eq!(trim_root("a\\\\."), "a\\\\");
        assert_eq!(trim_root("example.com."), "example.com");
    }

    #[test]
    fn test_invalid_escapes_are_rejected() {
        for name in ["a\\", "a\\25", "a\\256.com"] {
            assert!(
                matches!(
                    encode_name(&mut Vec::new(), name),
                    Err(DomainError::InvalidDomainName(_))
                ),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_escaped_bytes_count_once_toward_label_limit() {
        let label = "\\046".repeat(63);
        let buf = encoded(&label);
        assert_eq!(buf[0], 63);
        assert!(buf[1..64].iter().all(|b| *b == b'.'));
    }
}
