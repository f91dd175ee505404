//! Resolving focus items to local working copies and branches.
//!
//! The engine does not open, clone, or prompt for repositories itself; it
//! asks the [`RepositoryLocator`] and remembers the answer on the item.

use std::sync::Arc;

use triage::{
    BranchRef, FocusItem, GitRemote, LocalRepository, LocateOptions, RepositoryLocator,
    TriageError,
};

/// Returns the working copy for `item`, consulting the locator only when the
/// item has none yet or `options.force` is set.
#[tracing::instrument(skip(locator, item), fields(entity_id = %item.entity_id))]
pub(crate) async fn locate_repository(
    locator: &dyn RepositoryLocator,
    item: &FocusItem,
    options: LocateOptions,
) -> Result<Option<Arc<dyn LocalRepository>>, TriageError> {
    if !options.force {
        if let Some(repository) = item.local_repository() {
            return Ok(Some(repository));
        }
    }

    let repository = locator
        .get_repository(&item.repository_descriptor(), options)
        .await?;

    match &repository {
        Some(found) => tracing::debug!(path = found.path(), "Located local repository"),
        None => tracing::debug!("No local repository for item"),
    }
    item.set_local_repository(repository.clone());
    Ok(repository)
}

/// Finds the ref to check out for `item`'s head branch in `repository`.
///
/// The remote is matched on the head owner (falling back to the base
/// repository owner when the head owner is unknown). A local branch already
/// tracking `remote/branch` wins; otherwise a not-yet-fetched remote branch
/// reference is synthesized. `None` when the item has no head ref or no
/// remote matches.
pub(crate) async fn resolve_branch_ref(
    repository: &dyn LocalRepository,
    item: &FocusItem,
) -> Result<Option<BranchRef>, TriageError> {
    let Some(head) = item.head.as_ref() else {
        return Ok(None);
    };
    let owner = head
        .remote_owner
        .as_deref()
        .unwrap_or(&item.repository.owner);

    let remotes = repository.remotes().await?;
    let Some(remote) = remotes
        .iter()
        .find(|remote| remote_matches(remote, item, owner))
    else {
        tracing::debug!(owner, "No local remote matches the head owner");
        return Ok(None);
    };

    let upstream = format!("{}/{}", remote.name, head.branch);
    let branches = repository.branches().await?;
    let tracking = branches
        .into_iter()
        .find(|branch| !branch.remote && branch.upstream.as_deref() == Some(upstream.as_str()));

    Ok(Some(match tracking {
        Some(branch) => BranchRef::Local {
            name: branch.name,
            upstream,
        },
        None => BranchRef::RemoteUnmaterialized {
            remote: remote.name.clone(),
            branch: head.branch.clone(),
            sha: head.sha.clone(),
        },
    }))
}

fn remote_matches(remote: &GitRemote, item: &FocusItem, owner: &str) -> bool {
    let same_provider = remote.provider.is_none_or(|provider| provider == item.provider);
    let same_owner = remote
        .owner
        .as_deref()
        .is_some_and(|remote_owner| remote_owner.eq_ignore_ascii_case(owner));
    same_provider && same_owner
}
