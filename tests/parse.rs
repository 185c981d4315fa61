use uri_kit::{components::HostKind, ParseOptions, Uri, UriStatus, UriString, Warnings};

#[test]
fn parse_absolute() {
    let u: Uri<&str> = Uri::parse("https://user:pw@example.com:8443/a/b?x=1&y#frag").unwrap();
    assert_eq!(u.scheme(), Some("https"));
    assert_eq!(u.username_raw(), Some("user"));
    assert_eq!(u.password_raw(), Some("pw"));
    assert_eq!(u.host_raw(), Some("example.com"));
    assert_eq!(u.host_kind(), Some(HostKind::Domain));
    assert_eq!(u.port(), Some(8443));
    assert_eq!(u.authority_raw(), Some("user:pw@example.com:8443"));
    assert_eq!(u.path_raw(), "/a/b");
    assert_eq!(u.queries_raw(), Some("x=1&y"));
    assert_eq!(u.fragment_raw(), Some("frag"));
    assert!(u.has_credentials() && u.has_password() && u.has_port());
    assert!(!u.is_urn());
    assert!(u.warnings().is_empty());

    let u: Uri<&str> = Uri::parse("file:///etc/hosts").unwrap();
    assert_eq!(u.scheme(), Some("file"));
    assert_eq!(u.host_raw(), Some(""));
    assert_eq!(u.host_kind(), Some(HostKind::Empty));
    assert_eq!(u.port(), None);
    assert_eq!(u.path_raw(), "/etc/hosts");
    assert_eq!(u.queries_raw(), None);
    assert_eq!(u.fragment_raw(), None);

    let u: Uri<&str> = Uri::parse("ftp://ftp.is.co.za/rfc/rfc1808.txt").unwrap();
    assert_eq!(u.host_raw(), Some("ftp.is.co.za"));
    assert_eq!(u.port_uint16(), 21);
    assert_eq!(u.path_raw(), "/rfc/rfc1808.txt");

    let u: Uri<&str> = Uri::parse("ldap://[2001:db8::7]/c=GB?objectClass?one").unwrap();
    assert_eq!(u.host_raw(), Some("[2001:db8::7]"));
    assert_eq!(u.host_kind(), Some(HostKind::Ipv6));
    assert_eq!(u.path_raw(), "/c=GB");
    assert_eq!(u.queries_raw(), Some("objectClass?one"));

    let u: Uri<&str> = Uri::parse("telnet://192.0.2.16:80/").unwrap();
    assert_eq!(u.host_kind(), Some(HostKind::Ipv4));
    assert_eq!(u.port(), Some(80));
    assert_eq!(u.port_uint16(), 80);

    let u: Uri<&str> = Uri::parse("foo://example.com:8042/over/there?name=ferret#nose").unwrap();
    assert_eq!(u.host_kind(), Some(HostKind::Opaque));
    assert_eq!(u.port(), Some(8042));
    assert_eq!(u.fragment_raw(), Some("nose"));
}

#[test]
fn parse_opaque() {
    let u: Uri<&str> = Uri::parse("urn:example:foo").unwrap();
    assert_eq!(u.scheme(), Some("urn"));
    assert!(!u.has_host());
    assert_eq!(u.host_raw(), None);
    assert_eq!(u.path_raw(), "example:foo");
    assert!(u.is_urn());
    assert_eq!(u.path(), None);

    let u: Uri<&str> = Uri::parse("mailto:John.Doe@example.com?subject=hi#top").unwrap();
    assert!(u.is_urn());
    assert_eq!(u.path_raw(), "John.Doe@example.com");
    assert_eq!(u.queries_raw(), Some("subject=hi"));
    assert_eq!(u.fragment_raw(), Some("top"));
    assert!(u.domains().is_empty());

    let u: Uri<&str> = Uri::parse("foo:/a/b").unwrap();
    assert!(!u.is_urn());
    assert!(!u.has_host());
    assert_eq!(u.path_raw(), "/a/b");
}

#[test]
fn parse_relative() {
    let u: Uri<&str> = Uri::parse("//example.com").unwrap();
    assert_eq!(u.scheme(), None);
    assert!(!u.has_scheme());
    assert_eq!(u.host_raw(), Some("example.com"));
    assert_eq!(u.path_raw(), "");

    let u: Uri<&str> = Uri::parse("../a/b?q#f").unwrap();
    assert_eq!(u.scheme(), None);
    assert_eq!(u.host_raw(), None);
    assert_eq!(u.path_raw(), "../a/b");
    assert_eq!(u.queries_raw(), Some("q"));
    assert_eq!(u.fragment_raw(), Some("f"));

    let u: Uri<&str> = Uri::parse("#only").unwrap();
    assert_eq!(u.path_raw(), "");
    assert_eq!(u.fragment_raw(), Some("only"));

    let u: Uri<&str> = Uri::new("a:b/c");
    assert_eq!(u.scheme(), Some("a"));

    let err = Uri::<&str>::parse_with("a/b", ParseOptions::new().require_scheme(true)).unwrap_err();
    assert_eq!(err.status(), UriStatus::MissingSchemeNonRelativeUrl);
    assert_eq!(err.index(), 0);

    let err = Uri::<&str>::parse("1a:b").unwrap_err();
    assert_eq!(err.status(), UriStatus::SchemeEndedUnexpectedly);
    assert_eq!(err.index(), 2);
}

#[test]
fn special_schemes() {
    let u: Uri<&str> = Uri::parse("http://example.com:80/").unwrap();
    assert_eq!(u.port(), None);
    assert!(!u.has_port());
    assert_eq!(u.port_uint16(), 80);
    assert!(u.warnings().contains(Warnings::DEFAULT_PORT_ELIDED));
    assert_eq!(u.to_canonical(), "http://example.com/");

    let u: Uri<&str> = Uri::parse("http://example.com:8080/").unwrap();
    assert_eq!(u.port(), Some(8080));
    assert_eq!(u.port_uint16(), 8080);
    assert_eq!(u.to_canonical(), "http://example.com:8080/");

    let u: Uri<&str> = Uri::parse("https://example.com:443/x").unwrap();
    assert_eq!(u.port(), None);
    assert_eq!(u.to_canonical(), "https://example.com/x");
    assert_eq!(u.to_string(), "https://example.com/x");

    let u: Uri<&str> = Uri::parse("wss://example.com:443").unwrap();
    assert_eq!(u.to_canonical(), "wss://example.com/");

    let u: Uri<&str> = Uri::parse("http:\\\\example.com\\a\\b").unwrap();
    assert_eq!(u.host_raw(), Some("example.com"));
    assert!(u.warnings().contains(Warnings::REVERSE_SOLIDUS_USED));
    assert_eq!(u.to_canonical(), "http://example.com/a/b");

    let u: Uri<&str> = Uri::parse("http:example.com/x").unwrap();
    assert_eq!(u.host_raw(), Some("example.com"));
    assert!(u.warnings().contains(Warnings::MISSING_FOLLOWING_SOLIDUS));

    let u: Uri<&str> = Uri::parse("http:///x").unwrap();
    assert_eq!(u.host_raw(), Some("x"));

    let err = Uri::<&str>::parse("http://").unwrap_err();
    assert_eq!(err.status(), UriStatus::HostMissing);
    assert_eq!(err.index(), 7);
}

#[test]
fn ip_hosts() {
    let u: Uri<&str> = Uri::parse("http://[::1]:8080/").unwrap();
    assert_eq!(u.host_raw(), Some("[::1]"));
    assert_eq!(u.port(), Some(8080));
    assert_eq!(u.host_kind(), Some(HostKind::Ipv6));

    let u: Uri<&str> = Uri::parse("http://[0:0:0:0:0:0:0:1]/").unwrap();
    assert_eq!(u.to_canonical(), "http://[::1]/");

    let u: Uri<&str> = Uri::parse("foo://[v1.fe80::a+en1]/").unwrap();
    assert_eq!(u.host_kind(), Some(HostKind::IpvFuture));

    let u: Uri<&str> = Uri::parse("http://127.0.0.1/").unwrap();
    assert_eq!(u.host_kind(), Some(HostKind::Ipv4));

    for (input, status, index) in [
        ("http://[::1/", UriStatus::InvalidIpLiteral, 7),
        ("http://[::g]/", UriStatus::InvalidIpLiteral, 8),
        ("http://[::1]x/", UriStatus::InvalidCharacter, 12),
        ("foo://[v.x]/", UriStatus::InvalidIpLiteral, 7),
    ] {
        let err = Uri::<&str>::parse(input).unwrap_err();
        assert_eq!((err.status(), err.index()), (status, index), "{input}");
    }
}

#[test]
fn userinfo() {
    let u: Uri<&str> = Uri::parse("http://a@b@example.com/").unwrap();
    assert_eq!(u.username_raw(), Some("a@b"));
    assert_eq!(u.username().as_deref(), Some("a%40b"));
    assert_eq!(u.host_raw(), Some("example.com"));
    assert_eq!(u.to_canonical(), "http://a%40b@example.com/");

    let u: Uri<&str> = Uri::parse("ftp://anon:@example.com/").unwrap();
    assert_eq!(u.username_raw(), Some("anon"));
    assert_eq!(u.password_raw(), Some(""));

    let u: Uri<&str> = Uri::parse("http://example.com/").unwrap();
    assert_eq!(u.username(), None);
    assert_eq!(u.password(), None);

    let err = Uri::<&str>::parse("file://me@host/x").unwrap_err();
    assert_eq!(err.status(), UriStatus::UnexpectedCredentials);

    let err = Uri::<&str>::parse("http://user@/x").unwrap_err();
    assert_eq!(err.status(), UriStatus::HostMissing);
    assert_eq!(err.index(), 12);
}

#[test]
fn ports() {
    for (input, status, index) in [
        ("http://example.com:99999/", UriStatus::PortOutOfRange, 19),
        ("http://example.com:8a/", UriStatus::PortInvalid, 20),
        ("file://host:21/", UriStatus::UnexpectedPort, 12),
    ] {
        let err = Uri::<&str>::parse(input).unwrap_err();
        assert_eq!((err.status(), err.index()), (status, index), "{input}");
    }

    let u: Uri<&str> = Uri::parse("foo://h:/").unwrap();
    assert_eq!(u.port(), None);
    assert_eq!(u.port_uint16(), 0);
}

#[test]
fn domains() {
    let u: Uri<&str> = Uri::parse("https://M%C3%BCnchen.example/").unwrap();
    assert_eq!(u.to_canonical(), "https://xn--mnchen-3ya.example/");

    let u: Uri<&str> = Uri::parse("https://bücher.example/").unwrap();
    assert_eq!(u.to_canonical(), "https://xn--bcher-kva.example/");

    for (input, status) in [
        ("http://-a.com/", UriStatus::BeginWithHyphen),
        ("http://a-.com/", UriStatus::EndWithHyphen),
        ("http://a..com/", UriStatus::EmptySubdomain),
        ("http://a.com./", UriStatus::DotAtEnd),
        ("http://ab--c.com/", UriStatus::DoubleHyphen),
    ] {
        assert_eq!(Uri::<&str>::new(input).status(), status, "{input}");
    }

    let long = format!("http://{}.com/", "a".repeat(64));
    assert_eq!(Uri::<&str>::new(long.as_str()).status(), UriStatus::SubdomainTooLong);

    let options = ParseOptions::new().validate_domains(false);
    assert!(Uri::<&str>::parse_with("http://-a.com/", options).is_ok());

    // Non-special schemes take any registered name.
    assert!(Uri::<&str>::parse("foo://-a..com/").is_ok());
}

#[test]
fn errors() {
    let err = Uri::<&str>::parse("").unwrap_err();
    assert_eq!(err.status(), UriStatus::EmptyString);
    assert_eq!(err.index(), 0);

    for (input, status, index) in [
        ("http://example.com/a b", UriStatus::InvalidCharacter, 20),
        ("http://example.com/%zz", UriStatus::InvalidPercentEncoding, 19),
        ("http://example.com/?a#b#c", UriStatus::InvalidCharacter, 23),
        ("foo:a{b", UriStatus::InvalidCharacter, 5),
        ("http://exa mple.com/", UriStatus::InvalidCharacter, 10),
    ] {
        let err = Uri::<&str>::parse(input).unwrap_err();
        assert_eq!((err.status(), err.index()), (status, index), "{input}");
        assert_eq!(err.to_string(), format!("{} at index {}", status, index));
    }
}

#[test]
fn error_strings() {
    let u: Uri<&str> = Uri::new("http://example.com/a b");
    assert_eq!(u.error_string(), "path: invalid character at index 20");

    let u: Uri<&str> = Uri::new("http://a.com./");
    assert_eq!(u.error_string(), "host: domain ends with a dot at index 12");

    let u: Uri<&str> = Uri::new("http:example.com");
    assert_eq!(u.error_string(), "warning: missing following solidus");

    let u: Uri<&str> = Uri::new("http://example.com/");
    assert!(u.error().is_none());
    assert_eq!(u.error_string(), "");
}

#[test]
fn partial_accessors() {
    let u: Uri<&str> = Uri::new("http://user@example.com/a?b c#d");
    assert_eq!(u.status(), UriStatus::InvalidCharacter);
    assert_eq!(u.scheme(), Some("http"));
    assert_eq!(u.username_raw(), Some("user"));
    assert_eq!(u.host_raw(), Some("example.com"));
    assert_eq!(u.path_raw(), "/a");
    assert_eq!(u.queries_raw(), None);
    assert_eq!(u.fragment_raw(), None);
    assert!(!u.is_valid());
    assert_eq!(u.to_canonical(), "http://user@example.com/a?b c#d");
}

#[test]
fn lenient() {
    let options = ParseOptions::new().allow_invalid_characters(true);
    let u = UriString::parse_with("http://example.com/a b?c\"d#e`%", options).unwrap();
    assert!(u.warnings().contains(Warnings::INVALID_CHARACTER));
    assert!(u.warnings().contains(Warnings::INVALID_PERCENT_ENCODING));
    assert_eq!(u.path_raw(), "/a b");
    // Lenient-only components have no typed form.
    assert!(u.path().is_none());
    assert!(u.fragment().is_none());
    assert_eq!(u.to_canonical(), "http://example.com/a%20b?c%22d#e%60%25");
}

#[test]
fn lenient_host() {
    let options = ParseOptions::new().allow_invalid_characters(true);

    let u = UriString::parse_with("foo://a<b c/x", options).unwrap();
    assert!(u.warnings().contains(Warnings::INVALID_CHARACTER));
    let canonical = u.to_canonical();
    assert_eq!(canonical, "foo://a%3Cb%20c/x");
    let reparsed = UriString::parse(canonical.as_str()).unwrap();
    assert_eq!(reparsed.host_raw(), Some("a%3Cb%20c"));

    let err = UriString::parse_with("http://exa mple.com/", options).unwrap_err();
    assert_eq!(err.status(), UriStatus::InvalidCharacter);
    assert_eq!(err.index(), 10);
}

#[test]
fn file_drive_letters() {
    let u: Uri<&str> = Uri::parse("file:///C|/Windows").unwrap();
    assert_eq!(u.to_canonical(), "file:///C:/Windows");

    let u: Uri<&str> = Uri::parse("file://C:/Windows").unwrap();
    assert_eq!(u.host_raw(), Some(""));
    assert_eq!(u.to_canonical(), "file:///C:/Windows");

    let u: Uri<&str> = Uri::parse("file:/tmp/x").unwrap();
    assert_eq!(u.host_kind(), Some(HostKind::Empty));
    assert_eq!(u.to_canonical(), "file:///tmp/x");
}

#[test]
fn canonical_round_trip() {
    let inputs = [
        "HTTP://a@b@Example.COM:80/x/../y%20z",
        "http://[0:0::1]:8080/",
        "https://M%C3%BCnchen.example/a/./b?q='x'#f",
        "file:///C|/x",
        "urn:isbn:0451450523",
        "foo:/a/./b",
        "foo://Host/p?q#f",
        "//example.com/x",
        "../a/b",
        "ws://example.com:81",
        "mailto:a@example.com?subject=hi",
    ];
    for input in inputs {
        let first = Uri::<&str>::parse(input).unwrap().to_canonical();
        let again = Uri::<&str>::parse(first.as_str()).unwrap();
        assert_eq!(again.to_canonical(), first, "{input}");
    }
}

#[test]
fn owned_and_borrowed() {
    let owned = UriString::parse("http://example.com/").unwrap();
    let borrowed = owned.borrow();
    assert_eq!(borrowed, owned);
    assert_eq!(borrowed.host_raw(), Some("example.com"));
    assert_eq!(borrowed.to_owned(), owned);

    let parsed: UriString = "http://example.com/".parse().unwrap();
    assert_eq!(parsed, "http://example.com/");
    assert!("no scheme:x".parse::<UriString>().is_err());

    let u: Uri<&str> = Uri::try_from("foo:bar").unwrap();
    assert_eq!(u.path_raw(), "bar");
    assert_eq!(String::from(UriString::from(u)), "foo:bar");
}
