//! Rewrites a rebase instruction list so branches follow their commits.
//!
//! After every commit that has local branches pointing at it, an
//! `exec git branch -f <name>` is added so the branch lands on the rewritten
//! commit.  Commits folded in with `fixup`/`squash` belong to the preceding
//! commit, so the branch update waits until that commit is complete.
//!
//! Optionally, a commented-out section pushing every moved branch is added
//! before Git's trailing help text (or at the end of the list).

use std::io::{BufRead, Write};

/// Commands that produce a commit of their own
static REVISION_COMMANDS: &[&str] = &["p", "pick", "r", "reword", "e", "edit"];
/// Commands that fold into the preceding commit
static ABSORBING_COMMANDS: &[&str] = &["f", "fixup", "s", "squash"];

pub static PUSH_SECTION_HEADER: &str = "# Uncomment this section to push the changes.";

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct RestackOptions {
    /// Branch being rebased; git moves it itself
    pub rebase_head: Option<String>,
    /// Remote to generate the push section for; `None` or empty disables it
    pub remote: Option<String>,
}

impl RestackOptions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn rebase_head(mut self, name: Option<&str>) -> Self {
        self.rebase_head = name.map(ToOwned::to_owned);
        self
    }

    pub fn remote(mut self, remote: Option<&str>) -> Self {
        self.remote = remote.map(ToOwned::to_owned);
        self
    }
}

/// Rewrite the instruction list in `src` into `dst`.
pub fn restack<R: BufRead, W: Write>(
    src: R,
    dst: W,
    branches: &crate::git::Branches,
    options: &RestackOptions,
) -> std::io::Result<W> {
    let mut restacker = Restacker::new(dst, branches, options);
    for line in src.lines() {
        restacker.push_line(&line?)?;
    }
    restacker.finish()
}

/// Single pass, line-at-a-time rewriter.
///
/// Feed every line to [`Restacker::push_line`] and then call [`Restacker::finish`].
pub struct Restacker<'b, W> {
    dst: W,
    branches: &'b crate::git::Branches,
    rebase_head: Option<&'b str>,
    remote: Option<&'b str>,

    /// Branches on the most recent commit, waiting for it to be complete
    pending: &'b [crate::git::Branch],
    /// Branch names that received an update, in order
    updated: Vec<String>,
    wrote_push_section: bool,
    last_line_blank: bool,
}

impl<'b, W: Write> Restacker<'b, W> {
    pub fn new(dst: W, branches: &'b crate::git::Branches, options: &'b RestackOptions) -> Self {
        Self {
            dst,
            branches,
            rebase_head: options.rebase_head.as_deref().filter(|n| !n.is_empty()),
            remote: options.remote.as_deref().filter(|r| !r.is_empty()),
            pending: &[],
            updated: Vec::new(),
            wrote_push_section: false,
            last_line_blank: false,
        }
    }

    pub fn push_line(&mut self, line: &str) -> std::io::Result<()> {
        if line.is_empty() {
            // Sections are separated by a blank line; an update block already ends with one.
            if !self.flush_branches()? {
                self.write_line("")?;
            }
            return Ok(());
        }

        if line.starts_with('#') {
            // Git's help text follows the instructions
            self.flush_branches()?;
            let pad_before = !self.last_line_blank;
            self.write_push_section(pad_before, true)?;
            return self.write_line(line);
        }

        let mut parts = line.splitn(3, ' ');
        let command = parts.next().unwrap_or_default();
        if ABSORBING_COMMANDS.contains(&command) {
            log::trace!("`{command}` folds into the pending commit");
            return self.write_line(line);
        }

        self.flush_branches()?;
        self.write_line(line)?;

        if REVISION_COMMANDS.contains(&command) {
            if let Some(commit_id) = parts.next().filter(|id| !id.is_empty()) {
                self.pending = self.branches.get(commit_id).unwrap_or_default();
                if !self.pending.is_empty() {
                    log::trace!("{commit_id} carries {} branches", self.pending.len());
                }
            }
        }

        Ok(())
    }

    /// Flush anything pending and return the destination.
    pub fn finish(mut self) -> std::io::Result<W> {
        self.flush_branches()?;
        let pad_before = !self.last_line_blank;
        self.write_push_section(pad_before, false)?;
        self.dst.flush()?;
        Ok(self.dst)
    }

    /// Branches that received an update so far
    pub fn updated_branches(&self) -> &[String] {
        &self.updated
    }

    /// Add `git branch -f` for every pending branch.
    ///
    /// Returns whether anything was written; a written block ends with a blank line.
    fn flush_branches(&mut self) -> std::io::Result<bool> {
        let pending = std::mem::take(&mut self.pending);
        let mut wrote = false;
        for branch in pending {
            if Some(branch.name.as_str()) == self.rebase_head {
                log::trace!("Skipping {branch}, it is being rebased");
                continue;
            }

            self.write_line(&format!("exec git branch -f {}", branch.name))?;
            self.updated.push(branch.name.clone());
            wrote = true;
        }

        if wrote {
            self.write_line("")?;
        }

        Ok(wrote)
    }

    fn write_push_section(&mut self, pad_before: bool, pad_after: bool) -> std::io::Result<()> {
        if self.wrote_push_section {
            return Ok(());
        }
        self.wrote_push_section = true;

        let section = push_section(
            self.remote.unwrap_or_default(),
            &self.updated,
            pad_before,
            pad_after,
        );
        if section.is_empty() {
            return Ok(());
        }
        self.dst.write_all(section.as_bytes())?;
        self.last_line_blank = pad_after;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.dst, "{line}")?;
        self.last_line_blank = line.is_empty();
        Ok(())
    }
}

/// Render the commented-out push commands for `branches`.
///
/// Empty when there is no remote or nothing to push.
pub fn push_section(remote: &str, branches: &[String], pad_before: bool, pad_after: bool) -> String {
    use std::fmt::Write as _;

    if remote.is_empty() || branches.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    if pad_before {
        section.push('\n');
    }
    section.push_str(PUSH_SECTION_HEADER);
    section.push('\n');
    for branch in branches {
        let _ = writeln!(section, "# exec git push -f {remote} {branch}");
    }
    if pad_after {
        section.push('\n');
    }
    section
}
