/// Fixed Dockerfile instruction vocabulary.
///
/// Keywords are matched case-insensitively; the canonical form used for
/// documentation lookup is the upper-case spelling listed here.
pub const KEYWORDS: &[&str] = &[
    "ADD",
    "ARG",
    "CMD",
    "COPY",
    "ENTRYPOINT",
    "ENV",
    "EXPOSE",
    "FROM",
    "HEALTHCHECK",
    "LABEL",
    "MAINTAINER",
    "ONBUILD",
    "RUN",
    "SHELL",
    "STOPSIGNAL",
    "USER",
    "VOLUME",
    "WORKDIR",
];

/// Canonical (upper-case) form of `token` if it is a recognized instruction
/// keyword, `None` otherwise.
pub fn canonical(token: &str) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .find(|keyword| keyword.eq_ignore_ascii_case(token))
        .copied()
}
