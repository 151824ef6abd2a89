#[cfg(test)]
pub mod test {
    use crate::meta::{Describe, Field, Meta};

    /// Mirrors:
    ///
    /// ```text
    /// struct TestConfig {
    ///     host: String,     // desc:"The application host." default:"localhost"
    ///     port: u16,        // short:"p" default:"8080"
    ///     debug: bool,      // opts:"hidden"
    ///     database: TestDbConfig,
    /// }
    /// ```
    pub struct TestConfig;

    pub struct TestDbConfig;

    impl Describe for TestConfig {
        const META: Meta = Meta {
            name: "TestConfig",
            fields: &[
                Field::leaf("host", r#"desc:"The application host." default:"localhost""#),
                Field::leaf("port", r#"short:"p" default:"8080" desc:"The port number.""#),
                Field::leaf("Debug", r#"opts:"hidden" desc:"Enable debug mode.""#),
                Field::nested("database", r#"desc:"Database settings.""#, &TestDbConfig::META),
            ],
        };
    }

    impl Describe for TestDbConfig {
        const META: Meta = Meta {
            name: "TestDbConfig",
            fields: &[
                Field::leaf("url", r#"desc:"Connection string URL.""#),
                Field::leaf("pool_size", r#"default:"5" desc:"Connection pool size.""#),
            ],
        };
    }

    // -- Three-level nesting with renamed segments -----------------------------

    pub struct Deep;
    pub struct Mother;
    pub struct Father;

    impl Describe for Deep {
        const META: Meta = Meta {
            name: "Deep",
            fields: &[Field::nested("Mom", r#"id:"mother""#, &Mother::META)],
        };
    }

    impl Describe for Mother {
        const META: Meta = Meta {
            name: "Mother",
            fields: &[Field::nested("Father", "", &Father::META)],
        };
    }

    impl Describe for Father {
        const META: Meta = Meta {
            name: "Father",
            fields: &[Field::leaf(
                "child",
                r#"short:"S" default:"defaultvalue" desc:"testing..""#,
            )],
        };
    }

    // -- Two fields colliding on one id ----------------------------------------

    pub struct Clashing;

    impl Describe for Clashing {
        const META: Meta = Meta {
            name: "Clashing",
            fields: &[
                Field::leaf("address", r#"id:"host""#),
                Field::leaf("Host", ""),
            ],
        };
    }

    // -- A field with no name ------------------------------------------------

    pub struct Nameless;
    pub struct NamelessServer;

    impl Describe for Nameless {
        const META: Meta = Meta {
            name: "Nameless",
            fields: &[Field::nested("server", "", &NamelessServer::META)],
        };
    }

    impl Describe for NamelessServer {
        const META: Meta = Meta {
            name: "NamelessServer",
            fields: &[Field::leaf("", r#"name:"bind""#)],
        };
    }
}
