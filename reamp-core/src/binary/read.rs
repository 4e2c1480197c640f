use std::io::{self, Read};

use byteorder::{ByteOrder, LittleEndian};

// Все поля формата little-endian и лежат по точным смещениям, без выравнивания

pub fn read_i16_at(
    buf: &[u8],
    off: usize,
) -> i16 {
    LittleEndian::read_i16(&buf[off..off + 2])
}

pub fn read_u64_at(
    buf: &[u8],
    off: usize,
) -> u64 {
    LittleEndian::read_u64(&buf[off..off + 8])
}

pub fn read_f64_at(
    buf: &[u8],
    off: usize,
) -> f64 {
    LittleEndian::read_f64(&buf[off..off + 8])
}

/// Читает до заполнения `buf` или до EOF.
///
/// В отличие от `read_exact` возвращает количество реально прочитанных байт,
/// чтобы вызывающий мог отличить чистый конец потока от усечённой записи.
pub fn read_full<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
) -> io::Result<usize> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}
