/// One `@@` section of a file's diff.
#[derive(Debug, Clone)]
pub struct DiffHunk {
    pub file_path: String,
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// Added and removed lines, in diff order.
    pub fn changed_lines(&self) -> impl Iterator<Item = &DiffLine> {
        self.lines.iter().filter(|l| l.line_type != LineType::Context)
    }
}

#[derive(Debug, Clone)]
pub struct DiffLine {
    pub line_type: LineType,
    pub content: String,
    pub old_line_number: Option<u32>,
    pub new_line_number: Option<u32>,
}

impl DiffLine {
    /// Line number on the side the line belongs to: new for added and
    /// context lines, old for removed ones.
    pub fn line_number(&self) -> Option<u32> {
        match self.line_type {
            LineType::Removed => self.old_line_number,
            LineType::Added | LineType::Context => self.new_line_number,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Context,
    Added,
    Removed,
}

/// Parse the unified diff of a single file into hunks.
///
/// Anything outside a hunk body (`diff --git`, `index`, `---`/`+++` headers)
/// is skipped. Hunk bodies are delimited by the line counts in their header,
/// so a removed line whose text starts with `--` is never mistaken for a
/// file header.
pub fn parse_diff(diff_output: &str, file_path: &str) -> Vec<DiffHunk> {
    let mut hunks = Vec::new();
    let mut current_hunk: Option<HunkBuilder> = None;

    for line in diff_output.lines() {
        if let Some(ref mut builder) = current_hunk {
            if builder.is_complete() {
                if let Some(builder) = current_hunk.take() {
                    hunks.push(builder.build(file_path));
                }
            } else {
                if let Some(rest) = line.strip_prefix('+') {
                    builder.add_line(LineType::Added, rest);
                } else if let Some(rest) = line.strip_prefix('-') {
                    builder.add_line(LineType::Removed, rest);
                } else if let Some(rest) = line.strip_prefix(' ') {
                    builder.add_line(LineType::Context, rest);
                } else if line.is_empty() {
                    builder.add_line(LineType::Context, "");
                }
                // "\ No newline at end of file" and friends fall through
                continue;
            }
        }

        if line.starts_with("@@") {
            if let Some((old_start, old_count, new_start, new_count)) = parse_hunk_header(line) {
                current_hunk = Some(HunkBuilder {
                    old_remaining: old_count,
                    new_remaining: new_count,
                    old_line: old_start,
                    new_line: new_start,
                    lines: Vec::new(),
                });
            }
        }
    }

    if let Some(builder) = current_hunk {
        hunks.push(builder.build(file_path));
    }

    hunks
}

/// Accumulates hunk lines until both sides' header counts are used up.
struct HunkBuilder {
    old_remaining: u32,
    new_remaining: u32,
    old_line: u32,
    new_line: u32,
    lines: Vec<DiffLine>,
}

impl HunkBuilder {
    fn is_complete(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }

    fn take_old(&mut self) -> u32 {
        let n = self.old_line;
        self.old_line += 1;
        self.old_remaining = self.old_remaining.saturating_sub(1);
        n
    }

    fn take_new(&mut self) -> u32 {
        let n = self.new_line;
        self.new_line += 1;
        self.new_remaining = self.new_remaining.saturating_sub(1);
        n
    }

    fn add_line(&mut self, line_type: LineType, content: &str) {
        let (old_line_number, new_line_number) = match line_type {
            LineType::Added => (None, Some(self.take_new())),
            LineType::Removed => (Some(self.take_old()), None),
            LineType::Context => (Some(self.take_old()), Some(self.take_new())),
        };

        self.lines.push(DiffLine {
            line_type,
            content: content.to_owned(),
            old_line_number,
            new_line_number,
        });
    }

    fn build(self, file_path: &str) -> DiffHunk {
        DiffHunk {
            file_path: file_path.to_owned(),
            lines: self.lines,
        }
    }
}

fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32)> {
    // "@@ -l,s +l,s @@ <section heading>"
    let line = line.trim_start_matches("@@ ");
    let mut parts = line.split(' ');
    let old = parts.next()?.strip_prefix('-')?;
    let new = parts.next()?.strip_prefix('+')?;

    let (old_start, old_count) = parse_range(old)?;
    let (new_start, new_count) = parse_range(new)?;

    Some((old_start, old_count, new_start, new_count))
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    if let Some((start, count)) = range.split_once(',') {
        Some((start.parse().ok()?, count.parse().ok()?))
    } else {
        // Count omitted means a one-line range
        Some((range.parse().ok()?, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hunk_header_ranges() {
        assert_eq!(parse_hunk_header("@@ -3,4 +3,6 @@"), Some((3, 4, 3, 6)));
        assert_eq!(
            parse_hunk_header("@@ -42,2 +44,3 @@ function git_current_branch() {"),
            Some((42, 2, 44, 3))
        );
        assert_eq!(parse_hunk_header("@@ not a header @@"), None);
    }

    #[test]
    fn test_hunk_header_implicit_count() {
        assert_eq!(parse_hunk_header("@@ -7 +7 @@"), Some((7, 1, 7, 1)));
        assert_eq!(parse_hunk_header("@@ -0,0 +1 @@"), Some((0, 0, 1, 1)));
    }

    #[test]
    fn test_empty_input_has_no_hunks() {
        assert!(parse_diff("", "lib/key-bindings.zsh").is_empty());
    }

    #[test]
    fn test_added_alias_line() {
        let diff = "@@ -1,2 +1,3 @@\n alias g='git'\n+alias gsw='git switch'\n alias ga='git add'";
        let hunks = parse_diff(diff, "plugins/git/git.plugin.zsh");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].file_path, "plugins/git/git.plugin.zsh");
        assert_eq!(hunks[0].lines.len(), 3);

        let changed: Vec<_> = hunks[0].changed_lines().collect();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].line_type, LineType::Added);
        assert_eq!(changed[0].content, "alias gsw='git switch'");
    }

    #[test]
    fn test_line_numbers_follow_each_side() {
        let diff = "@@ -20,2 +20,2 @@\n bindkey -e\n-bindkey '^r' history-search\n+bindkey '^r' history-incremental-search-backward";
        let lines = &parse_diff(diff, "lib/key-bindings.zsh")[0].lines;

        assert_eq!((lines[0].old_line_number, lines[0].new_line_number), (Some(20), Some(20)));
        assert_eq!((lines[1].old_line_number, lines[1].new_line_number), (Some(21), None));
        assert_eq!((lines[2].old_line_number, lines[2].new_line_number), (None, Some(21)));
    }

    #[test]
    fn test_consecutive_hunks() {
        let diff = "@@ -1,1 +1,2 @@\n # theme\n+PROMPT='%~ '\n@@ -30,1 +31,1 @@\n-RPROMPT=''\n+RPROMPT='%T'";
        let hunks = parse_diff(diff, "themes/agnoster.zsh-theme");
        assert_eq!(hunks.len(), 2);
        let second: Vec<_> = hunks[1].changed_lines().map(DiffLine::line_number).collect();
        assert_eq!(second, vec![Some(30), Some(31)]);
    }

    #[test]
    fn test_file_headers_are_not_lines() {
        let diff = "\
diff --git a/lib/misc.zsh b/lib/misc.zsh
index 3f1c2a9..8b0d4e1 100644
--- a/lib/misc.zsh
+++ b/lib/misc.zsh
@@ -1,1 +1,1 @@
-setopt long_list_jobs
+setopt long_list_jobs interactivecomments";
        let hunks = parse_diff(diff, "lib/misc.zsh");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].lines.len(), 2);
        assert_eq!(hunks[0].lines[0].content, "setopt long_list_jobs");
    }

    #[test]
    fn test_removed_line_starting_with_dashes_is_content() {
        // Removing "-- note" yields a diff line "--- note"
        let diff = "@@ -1,2 +1,1 @@\n keep\n--- note";
        let hunks = parse_diff(diff, "notes.zsh");
        assert_eq!(hunks[0].lines.len(), 2);
        assert_eq!(hunks[0].lines[1].line_type, LineType::Removed);
        assert_eq!(hunks[0].lines[1].content, "-- note");
    }

    #[test]
    fn test_no_newline_marker_is_skipped() {
        let diff = "@@ -1,2 +1,2 @@\n old\n-line1\n\\ No newline at end of file\n+line2\n\\ No newline at end of file";
        let hunks = parse_diff(diff, "test.zsh");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].lines.len(), 3);
    }
}
