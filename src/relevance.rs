use crate::models::Repository;

/// Relevance of a repository: stars count double, forks and watchers once.
pub fn score(repo: &Repository) -> u64 {
    u64::from(repo.stars()) * 2 + u64::from(repo.forks()) + u64::from(repo.watchers())
}

/// Sort by descending relevance into a new vector.
///
/// The sort is stable, so repositories with equal scores keep the order
/// they arrived in. The input slice is left untouched.
pub fn rank(repos: &[Repository]) -> Vec<Repository> {
    let mut ranked = repos.to_vec();
    ranked.sort_by_key(|repo| std::cmp::Reverse(score(repo)));
    ranked
}
