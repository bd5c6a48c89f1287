// SPDX-License-Identifier: Apache-2.0

pub(crate) mod handlers;
pub(crate) mod handlers_utilities;
pub(crate) mod pages;
pub(crate) mod request_tracing;
pub(crate) mod response_contract;
pub(crate) mod tree_endpoints;
pub(crate) mod upload;
