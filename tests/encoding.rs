use std::borrow::Cow;

use uri_kit::pct_enc::{
    decode, decode_lossy, decode_to, decode_with, encode, encode_to,
    encoder::{Path, Query, QueryPair},
    table::{self, *},
    Charset, EStr, EString,
};

const RAW: &str = "te😃a 测1`~!@试#$%st^&+=";
const ENCODED: &str = "te%F0%9F%98%83a%20%E6%B5%8B1%60~!%40%E8%AF%95%23%24%25st%5E%26%2B%3D";

#[test]
fn enc_dec_validate() {
    let s = encode(RAW, COMPONENT_ENCODE_SET);
    assert_eq!(ENCODED, s);

    let mut buf = String::new();
    encode_to(&mut buf, RAW.as_bytes(), COMPONENT_ENCODE_SET);
    assert_eq!(ENCODED, buf);

    assert!(COMPONENT_ENCODE_SET.or_pct_encoded().matches(s.as_bytes()));
    assert_eq!(Ok(RAW.as_bytes()), decode(ENCODED).as_deref());

    let mut buf = Vec::new();
    assert_eq!(Ok(()), decode_to(&mut buf, ENCODED.as_bytes(), Charset::Any));
    assert_eq!(buf, RAW.as_bytes());

    assert_eq!(Ok(b"\x2d\xe6\xb5" as &[u8]), decode("%2D%E6%B5").as_deref());
    assert_eq!(Ok(b"-" as &[u8]), decode("%2d").as_deref());

    assert_eq!(3, decode("%2d%").unwrap_err().index());
    assert_eq!(3, decode("%2d%fg").unwrap_err().index());
    assert!(!PATH.matches(b"\0"));
}

#[test]
fn decode_rejects_truncated() {
    assert_eq!(decode("%2").unwrap_err().index(), 0);
    assert_eq!(decode("%G1").unwrap_err().index(), 0);
    assert_eq!(decode("ab%").unwrap_err().index(), 2);

    // A failed decode leaves the output as it was.
    let mut buf = b"keep".to_vec();
    assert!(decode_to(&mut buf, b"x%zz", Charset::Any).is_err());
    assert_eq!(buf, b"keep");
}

#[test]
fn encode_inverts_decode() {
    let inputs = ["", "plain", "50%", "%41", "a b+c&d=e", "ünïcödé/?#", RAW, "\0\x7f"];
    for input in inputs {
        for table in [COMPONENT_ENCODE_SET, UNRESERVED, PATH.sub_pct_encoded()] {
            let encoded = encode(input, table);
            assert_eq!(
                decode(&encoded).as_deref(),
                Ok(input.as_bytes()),
                "{input:?}"
            );
        }
    }
}

#[test]
fn encode_preserves_triplets() {
    assert_eq!(encode("a b/ü", PATH_ENCODE_SET), "a%20b/%C3%BC");
    assert_eq!(encode("%41%zz", PATH_ENCODE_SET), "%41%25zz");
    assert_eq!(encode("50%", PATH_ENCODE_SET), "50%25");
    assert_eq!(encode("%41", COMPONENT_ENCODE_SET), "%2541");
    assert_eq!(encode("'q'", SPECIAL_QUERY_ENCODE_SET), "%27q%27");
    assert_eq!(encode("'q'", QUERY_ENCODE_SET), "'q'");
    assert_eq!(encode("a`b", FRAGMENT_ENCODE_SET), "a%60b");
    assert_eq!(encode("u:p@h", USER_INFO_ENCODE_SET), "u%3Ap%40h");
}

#[test]
fn charsets() {
    let err = decode_with("a b", Charset::Allowed(table::UNRESERVED)).unwrap_err();
    assert_eq!(err.index(), 1);
    assert_eq!(
        decode_with("a%20b", Charset::Allowed(table::UNRESERVED)).as_deref(),
        Ok(b"a b" as &[u8])
    );

    let err = decode_with("a/b", Charset::Disallowed(Table::new(b"/"))).unwrap_err();
    assert_eq!(err.index(), 1);

    assert_eq!(decode_lossy("%FFok", Charset::Any).as_deref(), Ok("\u{FFFD}ok"));
    assert_eq!(decode_lossy("no-pct", Charset::Any).as_deref(), Ok("no-pct"));
}

#[test]
fn split() {
    let s = EStr::<Query>::new_or_panic("id=3&name=%E5%BC%A0%E4%B8%89");
    let mut split = s.split('&');

    let it = split.next().unwrap();
    assert_eq!(it, "id=3");
    assert_eq!(it.decode().to_string().as_deref(), Ok("id=3"));

    let (k, v) = it.split_once('=').unwrap();
    assert_eq!(k, "id");
    assert_eq!(v, "3");

    let it = split.next().unwrap();
    let (k, v) = it.split_once('=').unwrap();
    assert_eq!(k.decode().to_string().unwrap(), "name");
    assert_eq!(v.decode().to_string().unwrap(), "张三");
    assert!(split.next().is_none());

    assert!(EStr::<Query>::new("a b").is_none());
    assert!(EStr::<Query>::new("%4").is_none());

    let path = EStr::<Path>::new_or_panic("/a/%20b/");
    assert!(path.is_absolute());
    assert!(path.segments_if_absolute().unwrap().eq(["a", "%20b", ""]));
}

#[test]
fn estring() {
    let mut buf = EString::<Query>::new();
    buf.encode_str::<QueryPair>("a&b=c+d");
    buf.push('=');
    buf.encode_str::<QueryPair>("x y");
    assert_eq!(buf, "a%26b%3Dc%2Bd=x%20y");
    assert_eq!(buf.as_estr().len(), 19);

    buf.clear();
    assert!(buf.is_empty());
    buf.push_estr(EStr::new_or_panic("%E2%9C%93"));
    assert_eq!(buf.decode().to_string().unwrap(), "✓");
    assert_eq!(buf.into_string(), "%E2%9C%93");

    let mut buf = EString::<Query>::new();
    buf.encode_str::<QueryPair>("50%25");
    buf.push('&');
    buf.encode_data::<QueryPair>("50%25");
    assert_eq!(buf, "50%25&50%2525");
}

#[test]
fn estr_to_owned() {
    let s = EStr::<Query>::new_or_panic("q=%E2%9C%93");
    let owned: EString<Query> = s.to_owned();
    assert_eq!(owned, "q=%E2%9C%93");
    assert_eq!(owned.as_estr(), s);

    let cow: Cow<'_, EStr<Query>> = Cow::Borrowed(s);
    let mut owned = cow.into_owned();
    owned.push('&');
    assert_eq!(owned, "q=%E2%9C%93&");
}
