use std::io::{self, Write};

use encoding_rs::{EncoderResult, Encoding, UTF_8};

use crate::{ExportError, ExportResult};

const ENCODE_CHUNK: usize = 8 * 1024;

/// Находит кодировку выходного файла по метке.
///
/// Кроме меток WHATWG понимает распространённые питоновские имена
/// (`utf_8`, `latin-1`, `cp1252`).
pub fn resolve_encoding(label: &str) -> ExportResult<&'static Encoding> {
    let normalized = label.trim().to_lowercase().replace('_', "-");

    let encoding = Encoding::for_label(normalized.as_bytes())
        .or_else(|| {
            let windows = normalized.strip_prefix("cp")?;
            Encoding::for_label(format!("windows-{windows}").as_bytes())
        })
        .or_else(|| match normalized.as_str() {
            "latin-1" => Encoding::for_label(b"latin1"),
            _ => None,
        })
        .ok_or_else(|| ExportError::Config(format!("Unknown encoding '{label}'")))?;

    // UTF-16 и replacement encoding_rs кодировать не умеет
    if encoding.output_encoding() != encoding {
        return Err(ExportError::Config(format!(
            "Encoding '{label}' cannot be used for output"
        )));
    }

    Ok(encoding)
}

/// Перекодирует UTF-8 поток в целевую кодировку.
///
/// Неполные UTF-8 последовательности переносятся между вызовами `write`.
/// Непредставимый символ — ошибка `InvalidData`, замен не делается.
pub struct TranscodingWriter<W: Write> {
    inner: W,
    encoding: &'static Encoding,
    encoder: Option<encoding_rs::Encoder>,
    pending: Vec<u8>,
    out_buf: Vec<u8>,
}

impl<W: Write> TranscodingWriter<W> {
    pub fn new(
        inner: W,
        encoding: &'static Encoding,
    ) -> Self {
        // Для UTF-8 байты пропускаются без изменений
        let encoder = (encoding != UTF_8).then(|| encoding.new_encoder());

        Self {
            inner,
            encoding,
            encoder,
            pending: Vec::new(),
            out_buf: vec![0u8; ENCODE_CHUNK],
        }
    }

    /// Дописывает остаток и возвращает внутренний writer.
    pub fn finish(mut self) -> io::Result<W> {
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "stream ends inside a UTF-8 sequence",
            ));
        }
        if self.encoder.is_some() {
            self.encode_str("", true)?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn encode_str(
        &mut self,
        mut input: &str,
        last: bool,
    ) -> io::Result<()> {
        let Some(encoder) = self.encoder.as_mut() else {
            return self.inner.write_all(input.as_bytes());
        };

        loop {
            let (result, read, written) =
                encoder.encode_from_utf8_without_replacement(input, &mut self.out_buf, last);
            self.inner.write_all(&self.out_buf[..written])?;
            input = &input[read..];

            match result {
                EncoderResult::InputEmpty => return Ok(()),
                EncoderResult::OutputFull => continue,
                EncoderResult::Unmappable(c) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!(
                            "character {c:?} cannot be encoded as {}",
                            self.encoding.name()
                        ),
                    ));
                }
            }
        }
    }
}

impl<W: Write> Write for TranscodingWriter<W> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        if self.encoder.is_none() {
            return self.inner.write(buf);
        }

        self.pending.extend_from_slice(buf);

        let valid_up_to = match std::str::from_utf8(&self.pending) {
            Ok(s) => s.len(),
            // error_len() == None: последовательность просто не дописана
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                self.pending.truncate(self.pending.len() - buf.len());
                return Err(io::Error::new(io::ErrorKind::InvalidData, e));
            }
        };

        let pending = std::mem::take(&mut self.pending);
        // Префикс уже проверен from_utf8
        let text = std::str::from_utf8(&pending[..valid_up_to])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let result = self.encode_str(text, false);
        self.pending = pending[valid_up_to..].to_vec();
        result.map(|()| buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
