/// Expands a 6, 7 or 8 digit UPC-E code into its 12-digit UPC-A form.
///
/// Anything that is not a 6-8 character run of ASCII digits is returned
/// unchanged; short Code 128 reads land here and must not be rewritten.
pub fn convert(short_code: &str) -> String {
    if !is_convertible(short_code) {
        return short_code.to_string();
    }

    let mut code = short_code;
    if code.len() == 8 {
        // trailing check digit is recomputed below
        code = &code[..7];
    }
    if code.len() == 7 {
        // number system digit
        code = &code[1..];
    }

    let d: Vec<u8> = code.bytes().map(|b| b - b'0').collect();
    let body: [u8; 11] = match d[5] {
        0..=2 => [0, d[0], d[1], d[5], 0, 0, 0, 0, d[2], d[3], d[4]],
        3 => [0, d[0], d[1], d[2], 0, 0, 0, 0, 0, d[3], d[4]],
        4 => [0, d[0], d[1], d[2], d[3], 0, 0, 0, 0, 0, d[4]],
        _ => [0, d[0], d[1], d[2], d[3], d[4], 0, 0, 0, 0, d[5]],
    };

    let mut upca: String = body.iter().map(|&digit| char::from(b'0' + digit)).collect();
    upca.push(char::from(b'0' + check_digit(&body)));
    upca
}

/// Whether `convert` would expand this code.
pub fn is_convertible(code: &str) -> bool {
    (6..=8).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_digit())
}

/// Mod-10 check digit over digit values, weight 3 on even (0-based) positions.
pub fn check_digit(body: &[u8]) -> u8 {
    let (weighted, plain) = body
        .iter()
        .enumerate()
        .fold((0u32, 0u32), |(weighted, plain), (idx, &digit)| {
            if idx % 2 == 0 {
                (weighted + u32::from(digit), plain)
            } else {
                (weighted, plain + u32::from(digit))
            }
        });
    ((10 - (weighted * 3 + plain) % 10) % 10) as u8
}

/// True for a 12-digit string whose last digit matches its UPC-A check digit.
pub fn is_valid_upc_a(code: &str) -> bool {
    if code.len() != 12 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u8> = code.bytes().map(|b| b - b'0').collect();
    check_digit(&digits[..11]) == digits[11]
}
