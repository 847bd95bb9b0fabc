//
// markdown.rs
//
// Documentation content for instruction keywords and parser directives.
//
// The hover engine depends only on the `DocumentationProvider` capability,
// so tests can substitute a fake store and the core carries no global state.
//

/// Maps a canonical keyword (`FROM`, `EXPOSE`, ...) or directive name
/// (`escape`) to its markdown documentation.
pub trait DocumentationProvider {
    fn get_markdown(&self, key: &str) -> Option<String>;
}

/// Built-in markdown summaries for the Dockerfile vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownDocumentation;

impl MarkdownDocumentation {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentationProvider for MarkdownDocumentation {
    fn get_markdown(&self, key: &str) -> Option<String> {
        let content = match key {
            "escape" => {
                "Sets the character to use to escape characters and newlines in this Dockerfile. If unspecified, the default escape character is `\\`.\n\n```\n# escape=`\n```"
            }
            "ADD" => {
                "Copy new files, directories, or remote file URLs from `src` to the filesystem of the image at `dest`.\n\n```\nADD hello.txt /absolute/path\nADD hello.txt relative/to/workdir\n```"
            }
            "ARG" => {
                "Define a variable with an optional default value that users can set at build-time with `docker build --build-arg`.\n\n```\nARG userName\nARG testOutputDir=test\n```"
            }
            "CMD" => {
                "Provide defaults for an executing container. If an executable is omitted, an `ENTRYPOINT` instruction must be present. There can only be one `CMD` instruction in a Dockerfile.\n\n```\nCMD [ \"/bin/ls\", \"-l\" ]\n```"
            }
            "COPY" => {
                "Copy new files or directories from `src` to the filesystem of the image at `dest`.\n\n```\nCOPY hello.txt /absolute/path\nCOPY hello.txt relative/to/workdir\n```"
            }
            "ENTRYPOINT" => {
                "Configure the container to run as an executable.\n\n```\nENTRYPOINT [ \"/opt/app/run.sh\", \"--port\", \"8080\" ]\n```"
            }
            "ENV" => {
                "Set environment variables that persist when a container is run from the resulting image.\n\n```\nENV buildTag=1.0\n```"
            }
            "EXPOSE" => {
                "Inform Docker that the container listens on the specified network port(s) at runtime.\n\n```\nEXPOSE 8080\nEXPOSE 80 443 22\n```"
            }
            "FROM" => {
                "Sets the base image to use for subsequent instructions. A valid Dockerfile must start with a `FROM` instruction.\n\n```\nFROM baseImage\nFROM baseImage:tag\nFROM baseImage@digest\n```"
            }
            "HEALTHCHECK" => {
                "Tell Docker how to test a container to check that it is still working. Only the last `HEALTHCHECK` instruction takes effect.\n\n```\nHEALTHCHECK --interval=10m CMD curl -f http://localhost/\nHEALTHCHECK NONE\n```"
            }
            "LABEL" => {
                "Add metadata to an image as a key-value pair.\n\n```\nLABEL version=\"1.0\"\n```"
            }
            "MAINTAINER" => {
                "Set the *Author* field of the generated image. Deprecated in favor of `LABEL maintainer=...`.\n\n```\nMAINTAINER name\n```"
            }
            "ONBUILD" => {
                "Add a *trigger* instruction to the image that will be executed when the image is used as a base for another build.\n\n```\nONBUILD ADD . /opt/app/src\nONBUILD RUN /usr/local/bin/build.sh /opt/app\n```"
            }
            "RUN" => {
                "Execute any commands on top of the current image as a new layer and commit the results.\n\n```\nRUN apt-get update && apt-get install -y curl\n```"
            }
            "SHELL" => {
                "Override the default shell used for the *shell* form of commands.\n\n```\nSHELL [ \"powershell\", \"-command\" ]\n```"
            }
            "STOPSIGNAL" => {
                "Set the system call signal that will be sent to the container to exit.\n\n```\nSTOPSIGNAL 9\nSTOPSIGNAL SIGKILL\n```"
            }
            "USER" => {
                "Set the user name or UID to use when running the image in addition to any subsequent `RUN`, `CMD`, and `ENTRYPOINT` instructions.\n\n```\nUSER daemon\n```"
            }
            "VOLUME" => {
                "Create a mount point and mark it as holding externally mounted volumes from the native host or other containers.\n\n```\nVOLUME [ \"/var/db\" ]\n```"
            }
            "WORKDIR" => {
                "Set the working directory for any subsequent `RUN`, `CMD`, `ENTRYPOINT`, `COPY`, and `ADD` instructions.\n\n```\nWORKDIR /path/to/workdir\nWORKDIR relative/path\n```"
            }
            _ => return None,
        };
        Some(content.to_string())
    }
}
