// SPDX-License-Identifier: Apache-2.0

pub(crate) mod request_tracing;
pub(crate) mod timeout;
