use std::{
    io::{BufRead, BufReader, Read},
    thread::{self, JoinHandle},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub fn label(self) -> &'static str {
        match self {
            OutputStream::Stdout => "stdout",
            OutputStream::Stderr => "stderr",
        }
    }
}

/// Reads `reader` line by line until EOF and hands every line to `sink`.
/// Returns the number of forwarded lines.
pub fn forward_stream<R, F>(reader: R, stream: OutputStream, mut sink: F) -> usize
where
    R: Read,
    F: FnMut(OutputStream, &str),
{
    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::new();
    let mut forwarded = 0;

    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer);
                let line = line.trim_end_matches(['\r', '\n']);
                sink(stream, line);
                forwarded += 1;
            }
            Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(error) => {
                sink(stream, &format!("output stream closed with error: {error}"));
                break;
            }
        }
    }

    forwarded
}

pub fn spawn_output_forwarder<R, F>(
    reader: R,
    stream: OutputStream,
    sink: F,
) -> Result<JoinHandle<usize>, String>
where
    R: Read + Send + 'static,
    F: FnMut(OutputStream, &str) + Send + 'static,
{
    thread::Builder::new()
        .name(format!("backend-{}", stream.label()))
        .spawn(move || forward_stream(reader, stream, sink))
        .map_err(|error| {
            format!(
                "Failed to start backend {} forwarder: {}",
                stream.label(),
                error
            )
        })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn forward_stream_tags_every_line_with_its_stream() {
        let mut seen = Vec::new();
        let count = forward_stream(
            Cursor::new("  You can now view your Streamlit app\r\nURL: http://localhost:8501\n"),
            OutputStream::Stdout,
            |stream, line| seen.push((stream, line.to_string())),
        );

        assert_eq!(count, 2);
        assert_eq!(
            seen,
            vec![
                (
                    OutputStream::Stdout,
                    "  You can now view your Streamlit app".to_string()
                ),
                (OutputStream::Stdout, "URL: http://localhost:8501".to_string()),
            ]
        );
    }

    #[test]
    fn forward_stream_keeps_final_line_without_newline() {
        let mut seen = Vec::new();
        forward_stream(
            Cursor::new("Traceback (most recent call last)"),
            OutputStream::Stderr,
            |stream, line| seen.push(format!("{}:{}", stream.label(), line)),
        );
        assert_eq!(seen, vec!["stderr:Traceback (most recent call last)"]);
    }

    #[test]
    fn forward_stream_replaces_invalid_utf8() {
        let mut seen = Vec::new();
        forward_stream(
            Cursor::new(vec![b'o', b'k', 0xff, b'\n']),
            OutputStream::Stderr,
            |_, line| seen.push(line.to_string()),
        );
        assert_eq!(seen, vec!["ok\u{fffd}"]);
    }

    #[test]
    fn spawn_output_forwarder_finishes_at_eof() {
        let handle = spawn_output_forwarder(
            Cursor::new("a\nb\nc\n"),
            OutputStream::Stdout,
            |_, _| {},
        )
        .expect("spawn forwarder");
        assert_eq!(handle.join().expect("join forwarder"), 3);
    }
}
