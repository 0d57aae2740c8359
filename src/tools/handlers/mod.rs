// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tool handler implementations.

mod bash;

pub use bash::{BashHandler, BASH_TOOL};
