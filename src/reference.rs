// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Classification of user-supplied GitHub references.
//!
//! Two exact shapes are accepted: `https://github.com/<owner>` for profiles
//! and `https://github.com/<owner>/<repository>` for repositories. Anything
//! else, including a trailing slash or an extra path segment, is rejected.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

const HTML_BASE_URL: &str = "https://github.com";
const GIT_SUFFIX: &str = ".git";

static PROFILE_PATTERN: LazyLock<Regex,> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/([^/]+)$",).expect("profile pattern is valid",)
},);

static REPOSITORY_PATTERN: LazyLock<Regex,> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/([^/]+)/([^/]+)$",).expect("repository pattern is valid",)
},);

/// Category of a classified reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind
{
    /// A user or organization profile.
    Profile,
    /// A single repository owned by a user or organization.
    Repository,
}

/// Structured form of a GitHub reference.
///
/// A profile descriptor never carries a repository name; the enum shape
/// makes that impossible to express.
#[derive(Debug, Clone, PartialEq, Eq, Hash,)]
pub enum TargetDescriptor
{
    /// Profile-only target.
    Profile
    {
        /// Account login.
        owner: String,
    },
    /// Owner plus repository target.
    Repository
    {
        /// Account login owning the repository.
        owner:      String,
        /// Repository name with any trailing `.git` removed.
        repository: String,
    },
}

impl TargetDescriptor
{
    /// Returns the kind of target.
    pub fn kind(&self,) -> TargetKind
    {
        match self {
            Self::Profile {
                ..
            } => TargetKind::Profile,
            Self::Repository {
                ..
            } => TargetKind::Repository,
        }
    }

    /// Returns the account login.
    pub fn owner(&self,) -> &str
    {
        match self {
            Self::Profile {
                owner,
            }
            | Self::Repository {
                owner, ..
            } => owner,
        }
    }

    /// Returns the repository name for repository targets.
    pub fn repository(&self,) -> Option<&str,>
    {
        match self {
            Self::Profile {
                ..
            } => None,
            Self::Repository {
                repository, ..
            } => Some(repository,),
        }
    }

    /// Canonical `owner` or `owner/repository` string.
    pub fn slug(&self,) -> String
    {
        match self.repository() {
            Some(repository,) => format!("{}/{repository}", self.owner()),
            None => self.owner().to_owned(),
        }
    }

    /// Canonical browsable URL on github.com.
    pub fn html_url(&self,) -> String
    {
        format!("{HTML_BASE_URL}/{}", self.slug())
    }
}

impl std::fmt::Display for TargetDescriptor
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        f.write_str(&self.slug(),)
    }
}

/// Classifies a GitHub URL into a [`TargetDescriptor`].
///
/// The profile shape is checked first. A trailing `.git` on the repository
/// segment is stripped; a repository segment that is empty after stripping is
/// rejected.
///
/// # Errors
///
/// Returns [`Error::InvalidReference`] when the input matches neither shape.
///
/// # Examples
///
/// ```
/// use gh_insight::{TargetKind, classify};
///
/// let target = classify("https://github.com/octocat/Hello-World.git",)?;
/// assert_eq!(target.kind(), TargetKind::Repository);
/// assert_eq!(target.repository(), Some("Hello-World"));
/// assert!(classify("https://github.com/octocat/",).is_err());
/// # Ok::<(), gh_insight::Error>(())
/// ```
pub fn classify(input: &str,) -> Result<TargetDescriptor, Error,>
{
    if let Some(captures,) = PROFILE_PATTERN.captures(input,) {
        return Ok(TargetDescriptor::Profile {
            owner: captures[1].to_owned(),
        },);
    }

    if let Some(captures,) = REPOSITORY_PATTERN.captures(input,) {
        let segment = &captures[2];
        let repository = segment.strip_suffix(GIT_SUFFIX,).unwrap_or(segment,);
        if repository.is_empty() {
            return Err(Error::invalid_reference(input,),);
        }

        return Ok(TargetDescriptor::Repository {
            owner:      captures[1].to_owned(),
            repository: repository.to_owned(),
        },);
    }

    Err(Error::invalid_reference(input,),)
}
