// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Invocation requests.

use split_selector::CorrelationToken;
use std::path::Path;

/// One unit of work: an input tagged with its correlation token.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub token: CorrelationToken,
    pub input: Vec<u8>,
    /// Expected class, when known.
    pub true_label: Option<u32>,
}

impl InvocationRequest {
    pub fn new(token: impl Into<String>, input: Vec<u8>) -> Self {
        Self {
            token: CorrelationToken::new(token),
            input,
            true_label: None,
        }
    }

    pub fn with_true_label(mut self, label: u32) -> Self {
        self.true_label = Some(label);
        self
    }

    /// Reads `path` as the input. The file name becomes the token and a
    /// `<label>_` prefix, if present, the true label.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let input = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let true_label = label_from_name(&name);
        Ok(Self {
            token: CorrelationToken::new(name),
            input,
            true_label,
        })
    }
}

/// Parses the `<label>_` prefix of a file name.
pub fn label_from_name(name: &str) -> Option<u32> {
    let (prefix, _) = name.split_once('_')?;
    prefix.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_name() {
        assert_eq!(label_from_name("7_00042.png"), Some(7));
        assert_eq!(label_from_name("12_a_b.bin"), Some(12));
        assert_eq!(label_from_name("cat_1.png"), None);
        assert_eq!(label_from_name("7.png"), None);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("3_sample.bin");
        std::fs::write(&path, [9u8, 8, 7]).unwrap();
        let req = InvocationRequest::from_file(&path).unwrap();
        assert_eq!(req.token.as_str(), "3_sample.bin");
        assert_eq!(req.input, vec![9, 8, 7]);
        assert_eq!(req.true_label, Some(3));
    }
}
