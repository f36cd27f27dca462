/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */

mod walk;
pub use walk::{walk, walk_once, walk_once_mut, AstVisitor};
mod edit;
pub use edit::{edit, try_edit, AstTransformer};
