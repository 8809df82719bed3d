/*!
 * Splitting of large YAML documents into translation chunks.
 *
 * A boundary is only placed once the current chunk holds at least
 * `lines_per_chunk` lines, and only at a line that is not indented deeper than
 * the line before it, so a nested block is never cut at its start.
 */

/// Default number of lines per chunk
pub const DEFAULT_LINES_PER_CHUNK: usize = 250;

/// A contiguous run of document lines translated as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in the document
    pub index: usize,

    /// Zero-based index of the first line in the document
    pub start_line: usize,

    /// Lines, each keeping its line terminator
    pub lines: Vec<String>,
}

impl Chunk {
    /// Number of lines in the chunk
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the chunk holds no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Concatenated chunk text
    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

/// Number of leading spaces
pub fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Split lines into chunks in a single forward pass.
///
/// Every line, blank ones included, is measured by its leading spaces and
/// becomes the reference indentation for the next line. A chunk may grow past
/// `lines_per_chunk` when no safe boundary shows up.
pub fn split_into_chunks<S: AsRef<str>>(lines: &[S], lines_per_chunk: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut start_line = 0;
    let mut last_indent = 0;

    for (line_index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let indent = indentation(line);

        if current.len() >= lines_per_chunk && indent <= last_indent {
            chunks.push(Chunk {
                index: chunks.len(),
                start_line,
                lines: std::mem::take(&mut current),
            });
            start_line = line_index;
        }

        current.push(line.to_string());
        last_indent = indent;
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            index: chunks.len(),
            start_line,
            lines: current,
        });
    }

    chunks
}

/// Split document text into line-terminated lines and chunk them.
///
/// Documents of at most `lines_per_chunk` lines come back as one chunk.
pub fn split_document(text: &str, lines_per_chunk: usize) -> Vec<Chunk> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    split_into_chunks(&lines, lines_per_chunk)
}
