/// Local branches grouped by the (abbreviated) commit they point at.
///
/// Both the commits and the branches within a commit keep the order they were discovered in.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Branches {
    branches: indexmap::IndexMap<String, Vec<crate::git::Branch>>,
}

impl Branches {
    pub fn new(branches: impl IntoIterator<Item = crate::git::Branch>) -> Self {
        let mut grouped_branches = Self::default();
        grouped_branches.extend(branches);
        grouped_branches
    }

    pub fn from_repo(repo: &dyn crate::git::Repo) -> Result<Self, git2::Error> {
        let branches = Self::new(repo.local_branches()?);
        log::debug!(
            "Found {} branches across {} commits",
            branches.branches.values().map(Vec::len).sum::<usize>(),
            branches.branches.len()
        );
        Ok(branches)
    }

    pub fn insert(&mut self, branch: crate::git::Branch) {
        self.branches
            .entry(branch.commit_id.clone())
            .or_default()
            .push(branch);
    }

    pub fn extend(&mut self, branches: impl IntoIterator<Item = crate::git::Branch>) {
        for branch in branches {
            self.insert(branch);
        }
    }

    /// Branches pointing at `commit_id`, matched exactly
    pub fn get(&self, commit_id: &str) -> Option<&[crate::git::Branch]> {
        self.branches.get(commit_id).map(|v| v.as_slice())
    }
}
