use ublox_rx::{
    cfg_val, parse_frame, split_into_valset, CfgKeyVal, CfgLayerSet, CfgValue, Transaction,
    ValsetError, ValsetOptions, ValsetSplitter,
};

fn kvs(n: usize) -> Vec<CfgKeyVal> {
    (0..n)
        .map(|i| CfgKeyVal::new(0x4011_0000 | i as u32, CfgValue::Four(i as u32 * 1000)))
        .collect()
}

fn transactions(n: usize) -> Result<Vec<(Transaction, usize)>, ValsetError> {
    let batch = split_into_valset(&kvs(n), CfgLayerSet::RAM)?;
    Ok(batch.iter().map(|m| (m.transaction, m.num_items)).collect())
}

#[test]
fn split_sizes() {
    use Transaction as T;

    assert_eq!(transactions(0).unwrap(), [(T::None, 0)]);
    assert_eq!(transactions(1).unwrap(), [(T::None, 1)]);
    assert_eq!(transactions(64).unwrap(), [(T::None, 64)]);
    assert_eq!(
        transactions(65).unwrap(),
        [(T::Begin, 64), (T::Continue, 1), (T::End, 0)]
    );

    let most = transactions(64 * 19).unwrap();
    assert_eq!(most.len(), 20);
    assert_eq!(most[0], (T::Begin, 64));
    assert!(most[1..19].iter().all(|m| *m == (T::Continue, 64)));
    assert_eq!(most[19], (T::End, 0));

    assert_eq!(
        transactions(64 * 19 + 1),
        Err(ValsetError::TooManyItems {
            items: 64 * 19 + 1,
            messages: 20,
            max_messages: 19
        })
    );
}

#[test]
fn layers() {
    assert_eq!(
        split_into_valset(&kvs(3), CfgLayerSet::empty()),
        Err(ValsetError::NoLayerSelected)
    );
    for layer in [CfgLayerSet::RAM, CfgLayerSet::BBR, CfgLayerSet::FLASH] {
        let batch = split_into_valset(&kvs(3), layer).unwrap();
        let frame = parse_frame(&batch.messages()[0].frame).unwrap();
        assert_eq!(frame.payload[1], layer.bits());
    }
    assert_eq!(CfgLayerSet::all().bits(), 0b111);
}

#[test]
fn transaction_of_five_items() {
    let splitter = ValsetSplitter::new(ValsetOptions {
        max_kv_per_msg: 3,
        ..ValsetOptions::default()
    });
    let items = kvs(5);
    let batch = splitter
        .split(&items, CfgLayerSet::RAM | CfgLayerSet::FLASH)
        .unwrap();
    assert_eq!(batch.len(), 3);

    let mut decoded = Vec::new();
    for (msg, transaction) in batch.iter().zip([1, 2, 3]) {
        let frame = parse_frame(&msg.frame).unwrap();
        assert_eq!((frame.class, frame.msg_id), (0x06, 0x8a));
        assert_eq!(&frame.payload[..4], &[0x01, 0b101, transaction, 0x00]);
        decoded.extend(cfg_val::decode(&frame.payload[4..]).unwrap());
    }
    assert_eq!(decoded, items);
}

#[test]
fn invalid_value_size() {
    let bad = [
        CfgKeyVal::new(0x2091_0007, CfgValue::One(1)),
        CfgKeyVal::new(0x2091_0008, CfgValue::Two(1)),
    ];
    assert!(matches!(
        split_into_valset(&bad, CfgLayerSet::RAM),
        Err(ValsetError::Codec(_))
    ));
}
