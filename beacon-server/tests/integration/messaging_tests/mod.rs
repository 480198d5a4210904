mod test_offer_relayed_with_room_tag;
